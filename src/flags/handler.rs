// src/flags/handler.rs

use std::fmt;
use std::sync::Arc;

use super::FlagDefiner;

/// Permite a un handler (o a un router) definir sus propios flags.
pub trait FlagHandler: Send + Sync {
    fn define(&self, definer: &dyn FlagDefiner);
}

/// Adaptador para usar una función o closure como `FlagHandler`.
#[derive(Clone)]
pub struct FlagHandlerFunction(Arc<dyn Fn(&dyn FlagDefiner) + Send + Sync>);

impl FlagHandlerFunction {
    pub fn new<F>(function: F) -> Self
    where
        F: Fn(&dyn FlagDefiner) + Send + Sync + 'static,
    {
        Self(Arc::new(function))
    }
}

impl FlagHandler for FlagHandlerFunction {
    fn define(&self, definer: &dyn FlagDefiner) {
        (self.0)(definer)
    }
}

impl fmt::Debug for FlagHandlerFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FlagHandlerFunction")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::{DefaultFlagSet, FlagValues};

    #[test]
    fn function_adapter_defines_flags() {
        let handler = FlagHandlerFunction::new(|fd| {
            fd.bool("verbose", true, "salida detallada");
        });
        let flag_set = DefaultFlagSet::new("");
        handler.define(&flag_set);

        assert_eq!(flag_set.get_bool("verbose"), Some(true));
    }
}
