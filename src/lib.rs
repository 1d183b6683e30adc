// src/lib.rs

pub mod bridge;
pub mod c_api;
pub mod config;
pub mod controller;
pub mod core;
pub mod error;
pub mod logging;
pub mod persistence;
pub mod registry;

pub use crate::config::PlateConfig;
pub use crate::controller::{PlateController, UiEffect, UiEvent};
pub use crate::core::engine::PlateTransliterationEngine;
pub use crate::core::types::{FieldUpdate, Plate, PlateField, Script, ValidationResult};
pub use crate::error::{PlateError, Result};
