//! # takeout-consolidate CLI
//!
//! Command-line interface for the takeout consolidator.
//!
//! ## Usage
//! ```bash
//! takeout-consolidate run ~/Takeout --output ~/Pictures/consolidated
//! takeout-consolidate run ~/Takeout -o out --albums json --copy
//! ```

mod cli;

use takeout_consolidator::Result;

fn main() -> Result<()> {
    takeout_consolidator::init_tracing();
    cli::run()
}
