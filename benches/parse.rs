//! Benchmarks for stylesheet parsing.
//!
//! Run with: cargo bench

use criterion::{Criterion, criterion_group, criterion_main};

use tinsel::{ToCss, Tokenizer, parse};

/// Build a synthetic stylesheet with a mix of selector shapes.
fn sample_stylesheet(blocks: usize) -> String {
    let mut css = String::new();
    for i in 0..blocks {
        match i % 4 {
            0 => css.push_str(&format!(
                "div.block{i} > p:first-child {{ color: #33669{}; width: 10px }}\n",
                i % 10
            )),
            1 => css.push_str(&format!(
                "a[href^=\"http\"]:hover, #item{i} {{ text-decoration: underline }}\n"
            )),
            2 => css.push_str(&format!(
                "ul li ~ li.sep{i} {{ margin-top: 4pt; border: solid }}\n"
            )),
            _ => css.push_str(&format!(
                "h2#sec{i} {{ background: url(\"img/{i}.png\"); \
                 color: saturation(#804020, 30%) }}\n"
            )),
        }
    }
    css
}

fn bench_tokenize(c: &mut Criterion) {
    let css = sample_stylesheet(200);

    c.bench_function("tokenize", |b| {
        b.iter(|| {
            let mut tokens = Tokenizer::new(&css);
            while let Some(token) = tokens.next_token().unwrap() {
                std::hint::black_box(token);
            }
        });
    });
}

fn bench_parse(c: &mut Criterion) {
    let css = sample_stylesheet(200);

    c.bench_function("parse", |b| {
        b.iter(|| parse(&css).unwrap());
    });
}

fn bench_to_css(c: &mut Criterion) {
    let selectors = parse(&sample_stylesheet(200)).unwrap();

    c.bench_function("to_css", |b| {
        b.iter(|| {
            let mut buf = String::new();
            for selector in &selectors {
                selector.to_css(&mut buf);
                buf.push('\n');
            }
            std::hint::black_box(&buf);
        });
    });
}

fn bench_evaluate_values(c: &mut Criterion) {
    let selectors = parse(&sample_stylesheet(200)).unwrap();

    c.bench_function("evaluate_values", |b| {
        b.iter(|| {
            for selector in &selectors {
                for rule in &selector.rules {
                    match rule.name.as_str() {
                        "color" => {
                            let _ = std::hint::black_box(rule.value_color());
                        }
                        "width" | "margin-top" => {
                            let _ = std::hint::black_box(rule.value_int());
                        }
                        _ => {
                            let _ = std::hint::black_box(rule.value());
                        }
                    }
                }
            }
        });
    });
}

criterion_group!(
    benches,
    bench_tokenize,
    bench_parse,
    bench_to_css,
    bench_evaluate_values,
);
criterion_main!(benches);
