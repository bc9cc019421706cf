//! Pass trait for optimization passes.

use alsvid_ir::Circuit;

use crate::error::CompileResult;

/// A rewrite pass over the circuit's gate list.
///
/// Passes are the fundamental unit of optimization. Each pass consumes the
/// previous pass's output in place; the [`PassManager`](crate::PassManager)
/// runs them in a fixed order.
pub trait Pass: Send + Sync {
    /// Get the name of this pass.
    fn name(&self) -> &'static str;

    /// Run the pass on the given circuit.
    fn run(&self, circuit: &mut Circuit) -> CompileResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NopPass;

    impl Pass for NopPass {
        fn name(&self) -> &'static str {
            "nop"
        }

        fn run(&self, _circuit: &mut Circuit) -> CompileResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_pass_name() {
        let pass = NopPass;
        assert_eq!(pass.name(), "nop");
    }
}
