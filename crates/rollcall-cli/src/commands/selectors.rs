use anyhow::Result;

use crate::commands::{print_json, Context};

pub fn show(ctx: &Context<'_>) -> Result<()> {
    let selectors = &ctx.config.selectors;
    if ctx.json {
        return print_json(selectors);
    }

    println!("panel strategies (ranked):");
    for (rank, strategy) in selectors.panel.iter().enumerate() {
        println!("  {}. {}  {}", rank + 1, strategy.name, strategy.selector);
    }
    print_list("targeted", &selectors.targeted);
    print_list("ready", &selectors.ready);
    print_list("copyable", &selectors.copyable);
    println!(
        "settle: {:?} after_activation={}ms render={}ms poll={}ms",
        ctx.config.settle.mode,
        ctx.config.settle.after_activation.as_millis(),
        ctx.config.settle.render.as_millis(),
        ctx.config.settle.poll_interval.as_millis()
    );
    println!("min_length: {}", ctx.config.min_length);
    Ok(())
}

fn print_list(label: &str, selectors: &[String]) {
    println!("{label}:");
    for selector in selectors {
        println!("  {selector}");
    }
}
