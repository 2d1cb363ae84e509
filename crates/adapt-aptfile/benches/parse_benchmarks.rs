use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

const APTFILE: &str = r#"# bench fixture
ppa "deadsnakes/ppa"
repo "https://download.docker.com/linux/ubuntu" jammy stable, arch: "amd64", signed-by: "https://download.docker.com/linux/ubuntu/gpg"
repo-src "https://deb.example.org/debian" bookworm main
deb "https://example.com/releases/tool_1.2.3_amd64.deb"
package "python3.12"
package "curl=8.5.0-2ubuntu10"
package git, release: "jammy-updates"
pin "docker-ce" 1001, version: "5:24.0.7*"
hold docker-ce
"#;

fn bench_tokenize_line(c: &mut Criterion) {
    let line = adapt_aptfile::Coordinate::whole_line(
        1,
        r#"repo "https://download.docker.com/linux/ubuntu" jammy stable, arch: "amd64", signed-by: "https://download.docker.com/linux/ubuntu/gpg""#,
    );
    c.bench_function("tokenize_repo_line", |b| {
        b.iter(|| adapt_aptfile::tokenize(black_box(&line)).unwrap());
    });
}

fn bench_parse_file(c: &mut Criterion) {
    c.bench_function("parse_aptfile_10_lines", |b| {
        b.iter(|| adapt_aptfile::parse_str(black_box(APTFILE)).unwrap());
    });
}

fn bench_parse_large_file(c: &mut Criterion) {
    let large: String = (0..1000)
        .map(|i| format!("package \"pkg-{i}=1.{i}.0\"  # generated\n"))
        .collect();
    c.bench_function("parse_aptfile_1000_packages", |b| {
        b.iter(|| adapt_aptfile::parse_str(black_box(&large)).unwrap());
    });
}

criterion_group!(
    benches,
    bench_tokenize_line,
    bench_parse_file,
    bench_parse_large_file
);
criterion_main!(benches);
