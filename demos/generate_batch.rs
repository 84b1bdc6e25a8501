//! Batch generation example - three images of a random example prompt.
//!
//! Run with: `cargo run --example generate_batch`

use genpix::{AspectRatio, GenerationRequest, Orchestrator, PollinationsProvider, SlotUpdate};

#[tokio::main]
async fn main() -> genpix::Result<()> {
    let provider = PollinationsProvider::builder().build()?;
    let orchestrator = Orchestrator::builder(provider)
        .output_dir("gallery")
        .build();

    let mut updates = orchestrator.gallery().subscribe();
    tokio::spawn(async move {
        while let Ok(update) = updates.recv().await {
            if let SlotUpdate::Settled(slot) = update {
                println!("slot {}: {:?}", slot.index, slot.state);
            }
        }
    });

    let prompt = genpix::prompts::random_prompt();
    println!("Prompt: {prompt}");

    let ratio: AspectRatio = "16/9".parse()?;
    let request = GenerationRequest::new(prompt, 3, ratio)?;
    let report = orchestrator.run(&request).await?;

    println!(
        "{} ready, {} failed ({})",
        report.succeeded, report.failed, report.dimensions
    );
    Ok(())
}
