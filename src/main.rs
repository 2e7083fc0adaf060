//! aft: AWS Control Tower Account Factory for Terraform CLI

use anyhow::Result;

fn main() -> Result<()> {
    aft::cli::run()
}
