//! Engine configuration

use crate::tensor::Order;

/// Tunables shared by every tensor an engine creates
///
/// None of these affect element values, only traversal order and which
/// kernels run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Order used by factories when the caller asks for `Order::Any`
    pub default_order: Order,
    /// Traversal order for layouts that are neither C nor F
    pub irregular_order: Order,
    /// Use architecture SIMD kernels when the CPU supports them
    pub simd: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_order: Order::C,
            irregular_order: Order::Storage,
            simd: cfg!(feature = "simd"),
        }
    }
}

impl EngineConfig {
    /// Set the factory default order (`Any` and `Storage` become C)
    pub fn with_default_order(mut self, order: Order) -> Self {
        self.default_order = order.auto_fc(Order::C);
        self
    }

    /// Set the traversal order for irregular layouts (`Any` becomes `Storage`)
    pub fn with_irregular_order(mut self, order: Order) -> Self {
        self.irregular_order = match order {
            Order::Any => Order::Storage,
            other => other,
        };
        self
    }

    /// Enable or disable architecture SIMD kernels
    pub fn with_simd(mut self, simd: bool) -> Self {
        self.simd = simd && cfg!(feature = "simd");
        self
    }
}
