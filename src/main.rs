use anyhow::Result;

use sunspec_bridge::prelude::*;

fn main() -> Result<()> {
    sunspec_bridge::app(Options::new())
}
