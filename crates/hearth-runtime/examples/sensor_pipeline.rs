//! Minimal sensor → actuator pipeline over the bus.
//!
//! Run with logging enabled:
//!
//! ```sh
//! RUST_LOG=debug cargo run --example sensor_pipeline
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use hearth_runtime::{
    Component, ComponentError, Context, Core, CoreConfig, Dependency,
};
use serde_json::json;
use tracing::info;

/// Publishes a synthetic temperature reading every tick.
struct TempSensor {
    reading: f64,
}

impl Component for TempSensor {
    fn name(&self) -> &str {
        "temp_sensor"
    }

    fn init(&mut self, ctx: &Context) -> Result<(), ComponentError> {
        ctx.publish_sticky("sensor.temperature", self.reading);
        Ok(())
    }

    fn tick(&mut self, ctx: &Context) {
        self.reading += 0.5;
        ctx.publish_sticky("sensor.temperature", self.reading);
    }

    fn shutdown(&mut self, _ctx: &Context) -> Result<(), ComponentError> {
        Ok(())
    }
}

/// Switches a (pretend) fan when the temperature crosses a threshold.
struct FanActuator {
    deps: Vec<Dependency>,
    on: Rc<RefCell<bool>>,
}

impl FanActuator {
    const THRESHOLD: f64 = 22.0;

    fn new() -> Self {
        Self {
            deps: vec![Dependency::required("temp_sensor")],
            on: Rc::new(RefCell::new(false)),
        }
    }
}

impl Component for FanActuator {
    fn name(&self) -> &str {
        "fan"
    }

    fn dependencies(&self) -> &[Dependency] {
        &self.deps
    }

    fn init(&mut self, ctx: &Context) -> Result<(), ComponentError> {
        let on = Rc::clone(&self.on);
        let bus = ctx.bus().clone();
        ctx.subscribe_replay("sensor.*", move |ev| {
            let Some(celsius) = ev.payload.as_f64() else {
                return;
            };
            let should_run = celsius > Self::THRESHOLD;
            if *on.borrow() != should_run {
                *on.borrow_mut() = should_run;
                info!(celsius, fan = should_run, "fan state changed");
                bus.publish("fan/state", json!({ "on": should_run, "celsius": celsius }));
            }
        });
        Ok(())
    }

    fn tick(&mut self, _ctx: &Context) {}

    fn shutdown(&mut self, _ctx: &Context) -> Result<(), ComponentError> {
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut core = Core::new();
    core.add_component(TempSensor { reading: 20.0 })?;
    core.add_component(FanActuator::new())?;

    core.subscribe("fan/state", |ev| {
        info!(payload = %ev.payload, "telemetry: fan state");
    });

    core.begin(CoreConfig {
        device_name: "demo-device".into(),
        device_id: "demo-01".into(),
    })?;

    for _ in 0..8 {
        core.tick();
    }

    core.shutdown();
    Ok(())
}
