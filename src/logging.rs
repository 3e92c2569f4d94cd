//! ログ出力の初期化
//!
//! `RUST_LOG` が設定されていればそれを優先し、なければCLIフラグから決める。
//! 判定ごとのログは `-v` で、ファイルごとの詳細は `-vv` で出る。

use std::env;
use std::io::Write;

use env_logger::Builder;
use log::LevelFilter;

/// ログ出力を初期化する (プロセスで1回だけ呼ぶ)
pub fn init_logging(verbose: u8, quiet: bool) {
    let mut builder = Builder::new();
    if env::var_os("RUST_LOG").is_some() {
        builder.parse_default_env();
    } else {
        builder.filter_level(determine_level(verbose, quiet));
    }

    builder.format(|buf, record| {
        let level = record.level();
        let style = buf.default_level_style(level);
        writeln!(buf, "{style}{:<5}{style:#} {}", level, record.args())
    });

    // テストなどで既に初期化済みの場合は無視する
    let _ = builder.try_init();
}

fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}
