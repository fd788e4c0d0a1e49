//! Interest rate stochastic models.
//!
//! This module provides stochastic models for interest rate processes:
//! - Hull-White one-factor model (future implementation)
//! - Cox-Ingersoll-Ross (CIR) model (future implementation)
//!
//! # Feature Flag
//!
//! This module is available when the `rates` feature is enabled.
//!
//! # Future Implementation
//!
//! This module is a skeleton that will be implemented in future tasks.
