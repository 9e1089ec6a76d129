//! grid64 harness: one full resize / serialize / decode cycle.
//!
//! Demonstrates:
//!   1. Resizing to 768x1024 filled with 4.2
//!   2. Writing cells through the zero-copy view
//!   3. Two-phase serialize (cold then warm)
//!   4. Clearing the slot and decoding the retained encoding
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example harness

use std::error::Error;

use grid64_core::Dims;
use grid64_engine::{Engine, EngineConfig};
use tracing::info;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    let mut engine = Engine::new(EngineConfig::default())?;
    info!(sum = engine.sum(), "before resize");

    let capacity = engine.resize(Dims::new(768, 1024), 4.2)?;
    info!(
        height = engine.height(),
        width = engine.width(),
        count = engine.data_count(),
        capacity,
        sum = engine.sum(),
        "resized"
    );

    for (i, cell) in engine.cells_mut().iter_mut().enumerate() {
        *cell = (i % 1024) as f64 / 1024.0;
    }
    let sum = engine.sum();
    info!(sum, "cells written");

    let cold = engine.serialize_init()?;
    let warm = engine.serialize()?;
    info!(cold, warm, offset = ?engine.serialized_offset(), "serialized");

    let cleared = engine.clear_decoded();
    info!(cleared, sum = engine.sum(), "cleared");

    let count = engine.decode(768 * 1024)?;
    info!(count, sum = engine.sum(), "decoded");
    assert_eq!(engine.sum().to_bits(), sum.to_bits());

    match engine.decode(42) {
        Err(e) => info!(error = %e, "mismatched decode rejected"),
        Ok(n) => info!(n, "unexpected decode"),
    }
    Ok(())
}
