//! Market data provider with lazy evaluation and Arc caching.
//!
//! This module provides `MarketProvider` - a thread-safe cache for market data
//! objects that implements lazy evaluation (on-demand construction) and Arc-based
//! sharing for zero-copy access across threads.
//!
//! # Architecture Role
//!
//! `MarketProvider` is the "Pull" mechanism in the Pull-then-Push execution pattern:
//! - **Pull Phase**: Dependencies are resolved lazily via `get_curve()` / `get_vol()`
//! - **Push Phase**: Resolved references are passed to pricing kernels
//!
//! # Caching Strategy
//!
//! - Uses double-check locking pattern to prevent duplicate construction
//! - First access triggers construction with log output
//! - Subsequent accesses return cached `Arc` without logging
//!
//! # Example
//!
//! ```rust
//! use pricer_optimiser::provider::MarketProvider;
//! use pricer_core::types::Currency;
//!
//! let provider = MarketProvider::new();
//!
//! // First call bootstraps and caches the curve
//! let curve1 = provider.get_curve(Currency::USD);
//!
//! // Second call returns cached Arc (no bootstrap)
//! let curve2 = provider.get_curve(Currency::USD);
//!
//! // Both point to the same object
//! assert!(std::sync::Arc::ptr_eq(&curve1, &curve2));
//! ```

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use pricer_core::types::Currency;
use pricer_models::demo::{CurveEnum, FlatCurve, SabrVolSurface, VolSurfaceEnum};

/// Thread-safe market data provider with lazy evaluation and Arc caching.
///
/// Maintains separate caches for yield curves and volatility surfaces,
/// constructing objects on first access and sharing via `Arc` thereafter.
pub struct MarketProvider {
    /// Cache for yield curves, keyed by currency.
    curve_cache: RwLock<HashMap<Currency, Arc<CurveEnum>>>,
    /// Cache for volatility surfaces, keyed by currency.
    vol_cache: RwLock<HashMap<Currency, Arc<VolSurfaceEnum>>>,
}

impl MarketProvider {
    /// Creates a new `MarketProvider` with empty caches.
    ///
    /// # Returns
    ///
    /// A new `MarketProvider` instance ready for lazy population.
    pub fn new() -> Self {
        Self {
            curve_cache: RwLock::new(HashMap::new()),
            vol_cache: RwLock::new(HashMap::new()),
        }
    }

    /// Retrieves or constructs the yield curve for the given currency.
    ///
    /// Implements double-check locking pattern:
    /// 1. Acquire read lock, check cache
    /// 2. If miss, acquire write lock, check again (another thread may have populated)
    /// 3. If still miss, bootstrap curve, log, and cache
    ///
    /// # Arguments
    ///
    /// * `ccy` - The currency for which to retrieve the curve.
    ///
    /// # Returns
    ///
    /// `Arc<CurveEnum>` - shared reference to the yield curve.
    ///
    /// # Logging
    ///
    /// On cache miss, prints: `[Optimiser] Bootstrapping Yield Curve for {currency}...`
    pub fn get_curve(&self, ccy: Currency) -> Arc<CurveEnum> {
        // Fast path: read lock check
        {
            let cache = self.curve_cache.read().unwrap();
            if let Some(curve) = cache.get(&ccy) {
                return Arc::clone(curve);
            }
        }

        // Slow path: write lock with double-check
        let mut cache = self.curve_cache.write().unwrap();

        // Double-check: another thread may have populated while we waited
        if let Some(curve) = cache.get(&ccy) {
            return Arc::clone(curve);
        }

        // Bootstrap the curve
        println!("[Optimiser] Bootstrapping Yield Curve for {}...", ccy);

        // Create a flat curve with currency-specific rate (demo purposes)
        let rate = match ccy {
            Currency::USD => 0.05,
            Currency::EUR => 0.03,
            Currency::GBP => 0.04,
            Currency::JPY => 0.01,
            Currency::CHF => 0.02,
            _ => 0.03, // Default rate for unknown currencies
        };

        let curve = Arc::new(CurveEnum::Flat(FlatCurve { rate }));
        cache.insert(ccy, Arc::clone(&curve));
        curve
    }

    /// Retrieves or constructs the volatility surface for the given currency.
    ///
    /// Implements double-check locking pattern similar to `get_curve()`.
    ///
    /// # Arguments
    ///
    /// * `ccy` - The currency for which to retrieve the volatility surface.
    ///
    /// # Returns
    ///
    /// `Arc<VolSurfaceEnum>` - shared reference to the volatility surface.
    ///
    /// # Logging
    ///
    /// On cache miss, prints: `[Optimiser] Calibrating SABR Surface for {currency}...`
    pub fn get_vol(&self, ccy: Currency) -> Arc<VolSurfaceEnum> {
        // Fast path: read lock check
        {
            let cache = self.vol_cache.read().unwrap();
            if let Some(vol) = cache.get(&ccy) {
                return Arc::clone(vol);
            }
        }

        // Slow path: write lock with double-check
        let mut cache = self.vol_cache.write().unwrap();

        // Double-check: another thread may have populated while we waited
        if let Some(vol) = cache.get(&ccy) {
            return Arc::clone(vol);
        }

        // Calibrate the volatility surface
        println!("[Optimiser] Calibrating SABR Surface for {}...", ccy);

        // Create a SABR surface with currency-specific alpha (demo purposes)
        let alpha = match ccy {
            Currency::USD => 0.3,
            Currency::EUR => 0.25,
            Currency::GBP => 0.28,
            Currency::JPY => 0.2,
            Currency::CHF => 0.22,
            _ => 0.25, // Default alpha for unknown currencies
        };

        let vol = Arc::new(VolSurfaceEnum::Sabr(SabrVolSurface { alpha }));
        cache.insert(ccy, Arc::clone(&vol));
        vol
    }
}

impl Default for MarketProvider {
    fn default() -> Self {
        Self::new()
    }
}
