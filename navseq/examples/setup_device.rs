//! Walks the device setup sequence from the first page to submission,
//! printing what a presentation layer would be asked to show.
//!
//! Run with `RUST_LOG=debug cargo run --example setup_device` to see the
//! controller's own logs.

use navseq::prelude::*;
use navseq::sample::{LocationModel, SetupDeviceBuilder, SetupDevicePage, SiriModel};
use std::time::Duration;

const DOCUMENT: &str = r#"
sequence:
  reentrancy: reject
  clear_error_on_success: false
  labels:
    continue_label: "Continue"
    error_title: "Unable to Continue"
    dismiss_label: "OK"
"#;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = Logger::try_init_tracing("info") {
        eprintln!("tracing already initialised: {e}");
    }

    let document = SequenceLoader::from_yaml_str(DOCUMENT)?;
    SequenceLoader::validate(&document)?;

    let setup = SetupDeviceBuilder::default()
        .location(LocationModel::new().with_latency(Duration::from_millis(150)))
        .siri(SiriModel::new().with_latency(Duration::from_millis(150)))
        .config(document.sequence.clone())
        .build()?;

    let logger = Logger::for_sequence(&setup.controller.snapshot());
    logger.info("starting device setup");

    let (host, mut events) = ChannelHost::new();
    let printer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match event {
                NavigationEvent::Presented { index, content, .. } => {
                    println!("[{index}] {}", content.title);
                    println!("    {}", content.body.replace('\n', "\n    "));
                    if let Some(footer) = content.footer {
                        println!("    ({footer})");
                    }
                }
                NavigationEvent::Error { index, message } => {
                    println!("[{index}] error: {message}");
                }
                NavigationEvent::Finished { index } => {
                    println!("[{index}] submitting");
                }
            }
        }
    });

    let coordinator = FlowCoordinator::new(setup.controller.clone()).with_host(host);
    coordinator.start();

    loop {
        match coordinator.current_step() {
            Some(SetupDevicePage::Location) => setup.location.set_enable_location(true),
            Some(SetupDevicePage::Siri) => setup.siri.set_enable_siri(false),
            Some(SetupDevicePage::AutomaticUpdates) => {
                setup.automatic_updates.set_enable_automatic_updates(true)
            }
            None => break,
        }

        let state = coordinator.presentation();
        logger.debug(&format!(
            "step {}/{} can_continue={} label={}",
            state.index + 1,
            state.total,
            state.can_continue,
            state.continue_label
        ));

        match coordinator.on_continue().await? {
            ContinueOutcome::Advanced(_) => continue,
            ContinueOutcome::Finished => break,
            ContinueOutcome::Blocked { message } => {
                logger.warn(&format!("blocked: {message}"));
                coordinator.dismiss_alert();
            }
            ContinueOutcome::Disabled => {
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
        }
    }

    let snapshot = setup.controller.snapshot();
    logger.log_sequence_summary(&snapshot);
    logger.log_step_details(&snapshot);
    logger.info(&format!(
        "location={} siri={} automatic_updates={}",
        setup.location.enable_location(),
        setup.siri.enable_siri(),
        setup.automatic_updates.enable_automatic_updates()
    ));

    drop(coordinator);
    printer.await?;
    Ok(())
}
