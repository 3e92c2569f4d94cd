use std::process;

use linkdup::app::run;
use linkdup::cli::Args;

fn main() {
    let code = run(Args::parse_args());
    if code != 0 {
        process::exit(code);
    }
}
