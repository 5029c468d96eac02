use super::{CommandContext, read_input};
use anyhow::{Context, Result};
use scribe_engine::Provider;
use std::path::Path;
use std::sync::Arc;

pub async fn run_fix(ctx: &CommandContext, input: &str, output: Option<&Path>) -> Result<()> {
    let text = read_input(input)?;
    let result = Arc::clone(&ctx.provider).analyze_async(Arc::new(ctx.request(text.as_str()))).await;
    let fixed = result.apply_all(&text);

    match output {
        Some(path) => {
            std::fs::write(path, &fixed).with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("{} issue(s) found, fixed text written to {}", result.len(), path.display());
        }
        None => print!("{}", fixed),
    }

    Ok(())
}
