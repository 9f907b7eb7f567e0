//! A three page device setup sequence: location services, Siri and
//! automatic updates.
//!
//! Each page has a model holding its toggle. The models are always ready
//! to submit and always validate; an optional latency stands in for a
//! permission prompt or a network round trip.

use futures::FutureExt;
use navseq_context::StepIdentity;
use navseq_core::{
    ContentDescriptor, ContentRenderer, SequenceBuilder, SequenceConfig, SequenceController,
    SequenceError, StepValidator, ValidationFuture,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum SetupDevicePage {
    Location = 0,
    Siri = 1,
    AutomaticUpdates = 2,
}

impl StepIdentity for SetupDevicePage {
    fn all() -> &'static [Self] {
        &[
            SetupDevicePage::Location,
            SetupDevicePage::Siri,
            SetupDevicePage::AutomaticUpdates,
        ]
    }

    fn id(&self) -> usize {
        *self as usize
    }

    fn name(&self) -> &'static str {
        match self {
            SetupDevicePage::Location => "location",
            SetupDevicePage::Siri => "siri",
            SetupDevicePage::AutomaticUpdates => "automatic_updates",
        }
    }
}

macro_rules! toggle_model {
    ($(#[$meta:meta])* $model:ident, $field:ident, $setter:ident) => {
        $(#[$meta])*
        #[derive(Debug, Default)]
        pub struct $model {
            $field: AtomicBool,
            latency: Option<Duration>,
        }

        impl $model {
            pub fn new() -> Self {
                Self::default()
            }

            /// Delay every validation by `latency`.
            pub fn with_latency(mut self, latency: Duration) -> Self {
                self.latency = Some(latency);
                self
            }

            pub fn $field(&self) -> bool {
                self.$field.load(Ordering::SeqCst)
            }

            pub fn $setter(&self, enabled: bool) {
                self.$field.store(enabled, Ordering::SeqCst);
            }
        }

        impl StepValidator for $model {
            fn can_submit(&self) -> bool {
                true
            }

            fn validate_fields(&self) -> ValidationFuture {
                let latency = self.latency;
                async move {
                    if let Some(latency) = latency {
                        tokio::time::sleep(latency).await;
                    }
                    None
                }
                .boxed()
            }
        }
    };
}

toggle_model!(
    /// Location services page
    LocationModel,
    enable_location,
    set_enable_location
);
toggle_model!(
    /// Siri page
    SiriModel,
    enable_siri,
    set_enable_siri
);
toggle_model!(
    /// Automatic updates page
    AutomaticUpdatesModel,
    enable_automatic_updates,
    set_enable_automatic_updates
);

/// Title, body and footer text of each setup page.
#[derive(Debug, Default, Clone, Copy)]
pub struct SetupDeviceContent;

impl ContentRenderer<SetupDevicePage> for SetupDeviceContent {
    fn render(
        &self,
        step: SetupDevicePage,
        _controller: &SequenceController<SetupDevicePage>,
    ) -> ContentDescriptor {
        match step {
            SetupDevicePage::Location => ContentDescriptor::new(
                "Location Services",
                "Location Services allows Maps and other apps and services like Find My to gather and use data indicating your approximate location.",
            )
            .with_footer("About Location Services & Privacy...")
            .with_symbol("location"),
            SetupDevicePage::Siri => ContentDescriptor::new(
                "Siri",
                "Siri helps you get things done just by asking. Siri can even make suggestions before you ask in apps and keyboards.\n\nTo use Siri, press and hold the side button or say \"Hey Siri\" anytime.",
            )
            .with_footer("About Siri and Privacy...")
            .with_symbol("siri"),
            SetupDevicePage::AutomaticUpdates => ContentDescriptor::new(
                "Keep Your iPhone Up to Date",
                "Get the latest features, security, and improvements by updating iOS automatically.",
            )
            .with_footer(
                "You will receive a notification before updates are installed, and can choose other options in Settings.",
            )
            .with_symbol("gear"),
        }
    }
}

/// The setup sequence together with the models its validators read.
pub struct SetupDevice {
    pub location: Arc<LocationModel>,
    pub siri: Arc<SiriModel>,
    pub automatic_updates: Arc<AutomaticUpdatesModel>,
    pub controller: Arc<SequenceController<SetupDevicePage>>,
}

pub fn setup_device_sequence() -> Result<SetupDevice, SequenceError> {
    SetupDeviceBuilder::default().build()
}

/// Assembles a [`SetupDevice`] with custom models or configuration.
#[derive(Default)]
pub struct SetupDeviceBuilder {
    location: LocationModel,
    siri: SiriModel,
    automatic_updates: AutomaticUpdatesModel,
    config: SequenceConfig,
}

impl SetupDeviceBuilder {
    pub fn location(mut self, model: LocationModel) -> Self {
        self.location = model;
        self
    }

    pub fn siri(mut self, model: SiriModel) -> Self {
        self.siri = model;
        self
    }

    pub fn automatic_updates(mut self, model: AutomaticUpdatesModel) -> Self {
        self.automatic_updates = model;
        self
    }

    pub fn config(mut self, config: SequenceConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<SetupDevice, SequenceError> {
        let location = Arc::new(self.location);
        let siri = Arc::new(self.siri);
        let automatic_updates = Arc::new(self.automatic_updates);

        let controller = SequenceBuilder::new()
            .shared_validator(SetupDevicePage::Location, location.clone())
            .shared_validator(SetupDevicePage::Siri, siri.clone())
            .shared_validator(SetupDevicePage::AutomaticUpdates, automatic_updates.clone())
            .renderer(SetupDeviceContent)
            .config(self.config)
            .on_finished(|step| tracing::info!(step = step.name(), "device setup submitted"))
            .build()?;

        Ok(SetupDevice {
            location,
            siri,
            automatic_updates,
            controller: Arc::new(controller),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use navseq_context::check_enumeration;

    #[test]
    fn test_page_ids_match_positions() {
        assert!(check_enumeration::<SetupDevicePage>().is_ok());
        assert_eq!(SetupDevicePage::AutomaticUpdates.id(), 2);
    }

    #[test]
    fn test_models_hold_their_toggles() {
        let setup = setup_device_sequence().unwrap();
        assert!(!setup.location.enable_location());
        setup.location.set_enable_location(true);
        assert!(setup.location.enable_location());
        setup.siri.set_enable_siri(true);
        assert!(setup.siri.enable_siri());
        assert!(!setup.automatic_updates.enable_automatic_updates());
    }

    #[test]
    fn test_every_page_is_submittable_and_rendered() {
        let setup = setup_device_sequence().unwrap();
        for idx in 0..setup.controller.len() {
            assert!(setup.controller.can_submit(idx));
            assert!(!setup.controller.get_content_descriptor(idx).is_empty());
        }
        assert_eq!(
            setup.controller.get_content_descriptor(0).title,
            "Location Services"
        );
    }

    #[tokio::test]
    async fn test_latency_keeps_step_loading() {
        let setup = SetupDeviceBuilder::default()
            .siri(SiriModel::new().with_latency(Duration::from_millis(20)))
            .build()
            .unwrap();

        let pending = setup.controller.validate_step(1);
        assert!(setup.controller.is_step_loading(1));
        assert!(pending.await);
        assert!(!setup.controller.is_step_loading(1));
    }
}
