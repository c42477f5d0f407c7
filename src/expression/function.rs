//! Function registry and overload resolution.
//!
//! Function names map to one or more signatures. Registration happens once
//! at startup; afterwards the repository is read-only and safe to share
//! across query-compilation threads. Resolution picks the unique
//! cheapest-matching signature or fails, never falling back to
//! registration order.

use crate::data::{ExprType, ExprValue};
use crate::expression::error::{ExpressionError, ExpressionResult};
use crate::expression::operator;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

/// Case-normalized function name. `of("IFNULL")` and `of("ifnull")` name
/// the same function.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionName(String);

impl FunctionName {
    pub fn of(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FunctionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One concrete (parameter types, return type) registration under a name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionSignature {
    pub name: FunctionName,
    pub params: Vec<ExprType>,
    pub return_type: ExprType,
}

impl fmt::Display for FunctionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", param)?;
        }
        write!(f, ") -> {}", self.return_type)
    }
}

/// Implementation of one signature. Pure: same arguments, same result.
pub type ScalarImpl = Arc<dyn Fn(&[ExprValue]) -> ExprValue + Send + Sync>;

/// A registered function overload: signature plus implementation.
#[derive(Clone)]
pub struct ScalarFunction {
    signature: FunctionSignature,
    implementation: ScalarImpl,
}

impl ScalarFunction {
    pub fn new(
        name: FunctionName,
        params: Vec<ExprType>,
        return_type: ExprType,
        implementation: ScalarImpl,
    ) -> Self {
        Self {
            signature: FunctionSignature {
                name,
                params,
                return_type,
            },
            implementation,
        }
    }

    pub fn signature(&self) -> &FunctionSignature {
        &self.signature
    }

    pub fn return_type(&self) -> ExprType {
        self.signature.return_type
    }

    pub fn invoke(&self, args: &[ExprValue]) -> ExprValue {
        (self.implementation)(args)
    }
}

impl fmt::Debug for ScalarFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScalarFunction")
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

impl PartialEq for ScalarFunction {
    /// Two overloads are the same function exactly when their signatures
    /// match; implementations are not comparable.
    fn eq(&self, other: &Self) -> bool {
        self.signature == other.signature
    }
}

/// Catalog of function overloads. Built once during startup, read-only
/// afterwards.
#[derive(Default)]
pub struct FunctionRepository {
    functions: HashMap<FunctionName, Vec<ScalarFunction>>,
}

impl FunctionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one overload under its own name. Registration is append-only
    /// and must complete before the first resolution.
    pub fn register(&mut self, function: ScalarFunction) {
        self.functions
            .entry(function.signature().name.clone())
            .or_default()
            .push(function);
    }

    /// All candidate overloads for a name.
    pub fn lookup(&self, name: &FunctionName) -> ExpressionResult<&[ScalarFunction]> {
        self.functions
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| ExpressionError::UnknownFunction(name.clone()))
    }

    /// Select the unique best-matching overload for the argument types.
    ///
    /// Candidates of the wrong arity are discarded; the rest are scored
    /// per argument: exact match 0, untyped argument against a concrete
    /// parameter 1, concrete argument against an `Unknown` parameter 2,
    /// numeric widening 2 + steps, anything else non-viable. Deferring an
    /// untyped argument to a concrete parameter is preferred over
    /// discarding a concrete argument's type. The viable candidate with
    /// the unique minimum total cost wins. A tie is an error: picking a
    /// wrong overload silently is exactly the bug this algorithm exists
    /// to prevent.
    pub fn resolve(
        &self,
        name: &FunctionName,
        arg_types: &[ExprType],
    ) -> ExpressionResult<&ScalarFunction> {
        let candidates = self.lookup(name)?;

        let mut best: Option<(u32, &ScalarFunction)> = None;
        let mut tied = false;
        for candidate in candidates {
            let params = &candidate.signature().params;
            if params.len() != arg_types.len() {
                continue;
            }
            let Some(cost) = total_cost(params, arg_types) else {
                continue;
            };
            match best {
                None => best = Some((cost, candidate)),
                Some((best_cost, _)) if cost < best_cost => {
                    best = Some((cost, candidate));
                    tied = false;
                }
                Some((best_cost, _)) if cost == best_cost => tied = true,
                Some(_) => {}
            }
        }

        match best {
            None => Err(ExpressionError::NoMatchingSignature {
                name: name.clone(),
                arg_types: arg_types.to_vec(),
            }),
            Some(_) if tied => Err(ExpressionError::AmbiguousFunction {
                name: name.clone(),
                arg_types: arg_types.to_vec(),
            }),
            Some((_, function)) => {
                log::debug!("resolved {}", function.signature());
                Ok(function)
            }
        }
    }
}

fn total_cost(params: &[ExprType], arg_types: &[ExprType]) -> Option<u32> {
    params
        .iter()
        .zip(arg_types)
        .map(|(param, arg)| match_cost(*param, *arg))
        .sum()
}

fn match_cost(param: ExprType, arg: ExprType) -> Option<u32> {
    if arg == param {
        Some(0)
    } else if arg == ExprType::Unknown {
        Some(1)
    } else if param == ExprType::Unknown {
        Some(2)
    } else {
        ExprType::widening_steps(arg, param).map(|steps| 2 + steps as u32)
    }
}

/// The process-wide built-in catalog. Populated exactly once, in order, on
/// first use; every later access is a plain shared read.
pub fn builtins() -> &'static FunctionRepository {
    static BUILTINS: LazyLock<FunctionRepository> = LazyLock::new(|| {
        let mut repository = FunctionRepository::new();
        operator::arithmetic::register(&mut repository);
        operator::predicate::register(&mut repository);
        repository
    });
    &BUILTINS
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opaque(return_value: ExprValue) -> ScalarImpl {
        Arc::new(move |_| return_value.clone())
    }

    fn unary(name: &str, param: ExprType, return_type: ExprType) -> ScalarFunction {
        ScalarFunction::new(
            FunctionName::of(name),
            vec![param],
            return_type,
            opaque(ExprValue::Null),
        )
    }

    #[test]
    fn test_function_name_case_normalized() {
        assert_eq!(FunctionName::of("IFNULL"), FunctionName::of("ifnull"));
        assert_eq!(FunctionName::of("IfNull").as_str(), "ifnull");
    }

    #[test]
    fn test_lookup_unknown_name() {
        let repository = FunctionRepository::new();
        let err = repository.lookup(&FunctionName::of("nope")).unwrap_err();
        assert_eq!(err, ExpressionError::UnknownFunction(FunctionName::of("nope")));
    }

    #[test]
    fn test_resolve_exact_match() {
        let mut repository = FunctionRepository::new();
        repository.register(unary("f", ExprType::Integer, ExprType::Integer));
        repository.register(unary("f", ExprType::String, ExprType::String));

        let resolved = repository
            .resolve(&FunctionName::of("f"), &[ExprType::String])
            .unwrap();
        assert_eq!(resolved.signature().params, vec![ExprType::String]);
        assert_eq!(resolved.return_type(), ExprType::String);
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let mut repository = FunctionRepository::new();
        repository.register(unary("f", ExprType::Integer, ExprType::Integer));
        repository.register(unary("f", ExprType::Long, ExprType::Long));

        let name = FunctionName::of("f");
        let first = repository.resolve(&name, &[ExprType::Short]).unwrap().clone();
        for _ in 0..10 {
            let again = repository.resolve(&name, &[ExprType::Short]).unwrap();
            assert_eq!(*again, first);
        }
    }

    #[test]
    fn test_resolve_prefers_nearest_widening() {
        let mut repository = FunctionRepository::new();
        repository.register(unary("f", ExprType::Integer, ExprType::Integer));
        repository.register(unary("f", ExprType::Long, ExprType::Long));
        repository.register(unary("f", ExprType::Double, ExprType::Double));

        let resolved = repository
            .resolve(&FunctionName::of("f"), &[ExprType::Short])
            .unwrap();
        assert_eq!(resolved.signature().params, vec![ExprType::Integer]);
    }

    #[test]
    fn test_resolve_arity_mismatch() {
        let mut repository = FunctionRepository::new();
        repository.register(unary("f", ExprType::Integer, ExprType::Integer));

        let err = repository
            .resolve(&FunctionName::of("f"), &[ExprType::Integer, ExprType::Integer])
            .unwrap_err();
        assert_eq!(
            err,
            ExpressionError::NoMatchingSignature {
                name: FunctionName::of("f"),
                arg_types: vec![ExprType::Integer, ExprType::Integer],
            }
        );
    }

    #[test]
    fn test_resolve_incompatible_types() {
        let mut repository = FunctionRepository::new();
        repository.register(unary("f", ExprType::Integer, ExprType::Integer));

        let err = repository
            .resolve(&FunctionName::of("f"), &[ExprType::String])
            .unwrap_err();
        assert!(matches!(err, ExpressionError::NoMatchingSignature { .. }));
    }

    #[test]
    fn test_resolve_tie_is_ambiguous() {
        let mut repository = FunctionRepository::new();
        repository.register(unary("f", ExprType::Integer, ExprType::Integer));
        repository.register(unary("f", ExprType::String, ExprType::String));

        // An untyped argument matches both at equal cost
        let err = repository
            .resolve(&FunctionName::of("f"), &[ExprType::Unknown])
            .unwrap_err();
        assert_eq!(
            err,
            ExpressionError::AmbiguousFunction {
                name: FunctionName::of("f"),
                arg_types: vec![ExprType::Unknown],
            }
        );
    }

    #[test]
    fn test_unknown_parameter_accepts_anything() {
        let mut repository = FunctionRepository::new();
        repository.register(unary("f", ExprType::Unknown, ExprType::Unknown));

        for t in ExprType::core_types() {
            let resolved = repository.resolve(&FunctionName::of("f"), &[*t]).unwrap();
            assert_eq!(resolved.signature().params, vec![ExprType::Unknown]);
        }
    }

    #[test]
    fn test_case_insensitive_resolution() {
        let mut repository = FunctionRepository::new();
        repository.register(unary("IfNull", ExprType::Integer, ExprType::Integer));

        assert!(repository
            .resolve(&FunctionName::of("IFNULL"), &[ExprType::Integer])
            .is_ok());
    }
}
