//! Performance benchmarks for tokenizing and parsing configuration files

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use cwmrc::config::{lexer::tokenize, ConfigParser};

/// Build a configuration with `bindings` key bindings plus one of every
/// other directive
fn create_config(bindings: usize) -> String {
    let mut config = String::from(
        "# benchmark configuration\n\
         fontname \"sans-serif:pixelsize=14:bold\"\n\
         borderwidth 2\n\
         gap 10 10 10 10\n\
         color activeborder \"steel blue\"\n\
         command term \"xterm -bg black -fg white\"\n\
         autogroup 3 xterm.XTerm\n\
         mousebind M-1 window_move\n\n",
    );
    for i in 0..bindings {
        config.push_str(&format!("bind CM-{} \"group_only_{}\" # binding {}\n", i, i % 9, i));
    }
    config
}

fn benchmark_tokenize(c: &mut Criterion) {
    let config = create_config(200);
    c.bench_function("tokenize_200_bindings", |b| {
        b.iter(|| black_box(tokenize(black_box(&config))))
    });
}

fn benchmark_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for bindings in [10, 100, 1000] {
        let config = create_config(bindings);
        group.bench_with_input(BenchmarkId::from_parameter(bindings), &config, |b, config| {
            b.iter(|| {
                let settings = ConfigParser::new().parse_str(black_box(config));
                black_box(settings.is_ok())
            })
        });
    }
    group.finish();
}

fn benchmark_color_lookup(c: &mut Criterion) {
    c.bench_function("color_lookup", |b| {
        b.iter(|| black_box(ConfigParser::new().parse_str(black_box("color bg LightGoldenrodYellow\n"))))
    });
}

criterion_group!(benches, benchmark_tokenize, benchmark_parse, benchmark_color_lookup);
criterion_main!(benches);
