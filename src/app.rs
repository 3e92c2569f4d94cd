use std::time::Duration;

use anyhow::Context;

use crate::cli::Args;
use crate::config::DedupConfig;
use crate::engine::deduplicate;
use crate::error::{EXIT_CONFIG_ERROR, EXIT_INTERRUPTED, EXIT_SUCCESS};
use crate::i18n::{msg, Msg};
use crate::logging::init_logging;
use crate::prompt::{AlwaysConfirm, Confirm, PromptConfirm};
use crate::signal::install_handler;
use crate::stats::{format_size, Stats};

pub fn run(args: Args) -> i32 {
    init_logging(args.verbose, args.quiet);

    match run_inner(&args) {
        Ok(stats) => {
            print_summary(&args, &stats);
            if stats.interrupted {
                EXIT_INTERRUPTED
            } else {
                EXIT_SUCCESS
            }
        }
        Err(e) => {
            eprintln!("{}: {:#}", msg(Msg::ErrorOccurred), e);
            EXIT_CONFIG_ERROR
        }
    }
}

fn run_inner(args: &Args) -> anyhow::Result<Stats> {
    let config = DedupConfig::from_args(args).context("invalid arguments")?;
    let shutdown = install_handler();

    let mut stdin_confirm;
    let mut always = AlwaysConfirm;
    let confirm: &mut dyn Confirm = if config.interactive && !config.dry_run {
        stdin_confirm = PromptConfirm::stdin();
        &mut stdin_confirm
    } else {
        &mut always
    };

    let stats = deduplicate(&config, confirm, &shutdown)?;
    Ok(stats)
}

fn print_summary(args: &Args, stats: &Stats) {
    if args.quiet {
        return;
    }

    println!();
    let title = if stats.interrupted {
        Msg::SummaryInterrupted
    } else if args.dry_run {
        Msg::SummaryDryRun
    } else {
        Msg::SummaryComplete
    };
    println!("{}", msg(title));
    println!("  {}: {}", msg(Msg::FilesIndexed), stats.files_indexed);
    println!("  {}: {}", msg(Msg::PairsCompared), stats.pairs_compared);
    println!("  {}: {}", msg(Msg::DuplicatesFound), stats.linkable());
    println!("  {}: {}", msg(Msg::AlreadyLinked), stats.already_linked);

    if args.dry_run {
        println!("  {}: {}", msg(Msg::WouldLink), stats.would_link);
    } else {
        println!("  {}: {}", msg(Msg::Linked), stats.linked);
    }

    let optional = [
        (Msg::CrossDevice, stats.cross_device),
        (Msg::ContentMismatch, stats.content_mismatch),
        (Msg::CompareFailed, stats.compare_failed),
        (Msg::Declined, stats.declined),
        (Msg::LinkFailed, stats.link_failed),
    ];
    for (key, count) in optional {
        if count > 0 {
            println!("  {}: {}", msg(key), count);
        }
    }

    if !args.dry_run {
        println!("  {}: {}", msg(Msg::BytesReclaimed), format_size(stats.bytes_reclaimed));
    }
    println!("  {}: {}", msg(Msg::BytesReclaimable), format_size(stats.bytes_reclaimable));

    if args.verbose > 0 {
        println!("  {}: {}", msg(Msg::IndexTime), format_duration(stats.index_elapsed));
        println!("  {}: {}", msg(Msg::DedupTime), format_duration(stats.dedup_elapsed));
    }
}

fn format_duration(d: Duration) -> String {
    format!("{:.3}s", d.as_secs_f64())
}
