use super::*;
use crate::backend::FallbackBackend;
use crate::conformance::{sample_corpus, DEFAULT_SEED};
use std::path::PathBuf;

fn fallback_facade() -> Facade {
    Facade::resolve(&FacadeConfig::fallback())
}

#[test]
fn test_exports_are_fixed() {
    assert_eq!(
        exported_names(),
        &["hello", "add", "multiply", "sum_list", "reverse_string", "power"]
    );
    assert_eq!(fallback_facade().registry().names(), exported_names().to_vec());
}

#[test]
fn test_process_wide_facade_resolves_once() {
    let first = facade() as *const Facade;
    let second = facade() as *const Facade;
    assert_eq!(first, second);

    let kind = backend_kind();
    for _ in 0..10 {
        assert_eq!(backend_kind(), kind);
        assert_eq!(backend_name(), kind.name());
    }
}

#[test]
fn test_concurrent_first_use_sees_one_backend() {
    let handles: Vec<_> = (0..8)
        .map(|_| std::thread::spawn(|| facade() as *const Facade as usize))
        .collect();
    let addrs: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(addrs.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn test_free_functions_follow_the_contract() {
    // Holds for whichever backend the environment selected.
    assert!(hello().contains("demopy_gb_jj"));
    assert_eq!(add(2, 3).unwrap(), 5);
    assert_eq!(add(-1, 1).unwrap(), 0);
    assert_eq!(multiply(2.0, 3.0), 6.0);
    assert_eq!(multiply(-1.0, 1.0), -1.0);
    assert_eq!(sum_list(&[]).unwrap(), 0);
    assert_eq!(sum_list(&[42]).unwrap(), 42);
    assert_eq!(sum_list(&[1, 2, 3, 4, 5]).unwrap(), 15);
    assert_eq!(reverse_string("").unwrap(), "");
    assert_eq!(reverse_string("hello").unwrap(), "olleh");
    assert_eq!(power(2, 10).unwrap(), Number::Int(1024));
    assert_eq!(power(0, 0).unwrap(), Number::Int(1));
}

#[test]
fn test_sum_list_does_not_mutate_input() {
    let numbers = vec![3, 1, 2];
    let snapshot = numbers.clone();
    sum_list(&numbers).unwrap();
    assert_eq!(numbers, snapshot);
}

#[test]
fn test_reverse_string_is_an_involution() {
    let facade = fallback_facade();
    let corpus = sample_corpus(DEFAULT_SEED, 128);
    for s in &corpus.strings {
        let once = facade.reverse_string(s).unwrap();
        assert_eq!(&facade.reverse_string(&once).unwrap(), s);
    }
}

#[test]
fn test_power_of_zero_exponent_is_one() {
    let facade = fallback_facade();
    for base in [-5, -1, 0, 1, 7, i64::MIN, i64::MAX] {
        assert_eq!(facade.power(base, 0).unwrap(), Number::Int(1));
    }
}

#[test]
fn test_fallback_facade_reports_its_backend() {
    let facade = fallback_facade();
    assert_eq!(facade.kind(), BackendKind::Fallback);
    assert!(facade.hello().contains("fallback"));

    let info = facade.info();
    assert_eq!(info.kind, BackendKind::Fallback);
    assert_eq!(info.source, "fallback");
    assert_eq!(info.abi_version, ABI_VERSION);
    assert_eq!(info.version, VERSION);
}

#[test]
fn test_unloadable_library_is_never_surfaced() {
    let config = FacadeConfig {
        library_path: Some(PathBuf::from("/definitely/not/here/libdemopy_gb_jj.so")),
        ..Default::default()
    };
    let facade = Facade::resolve(&config);
    assert_eq!(facade.kind(), BackendKind::Fallback);
    assert_eq!(facade.add(40, 2).unwrap(), 42);
}

#[test]
fn test_invoke_json() {
    let facade = fallback_facade();
    assert_eq!(facade.invoke_json("add", "[2, 3]").unwrap(), "5");
    assert_eq!(facade.invoke_json("sum_list", "[[]]").unwrap(), "0");
    assert_eq!(
        facade.invoke_json("reverse_string", r#"["abc"]"#).unwrap(),
        r#""cba""#
    );
    assert_eq!(facade.invoke_json("power", "[2, -2]").unwrap(), "0.25");

    let err = facade.invoke_json("add", "[1]").unwrap_err();
    assert!(err.is_contract_violation());
    let err = facade.invoke_json("add", "not json").unwrap_err();
    assert!(matches!(err, DemopyError::SerdeJson(_)));
}

#[test]
fn test_info_serializes() {
    let json = serde_json::to_string(&fallback_facade().info()).unwrap();
    assert!(json.contains(r#""kind":"fallback""#));
}

#[test]
fn test_with_backend_uses_the_given_backend() {
    let facade = Facade::with_backend(Box::new(FallbackBackend::new()));
    assert_eq!(facade.kind(), BackendKind::Fallback);
    assert_eq!(
        facade.invoke("multiply", &[Value::Float(1.5), Value::Int(4)]).unwrap(),
        Value::Float(6.0)
    );
}

#[cfg(feature = "native")]
mod native {
    use super::*;
    use crate::conformance::compare_backends;

    #[test]
    fn test_auto_config_selects_accelerated() {
        let facade = Facade::resolve(&FacadeConfig::default());
        assert_eq!(facade.kind(), BackendKind::Accelerated);
        assert!(facade.hello().contains("native edition"));
        assert_eq!(facade.info().source, "linked");
    }

    #[test]
    fn test_backends_are_equivalent_on_the_shared_corpus() {
        let accelerated = Facade::resolve(&FacadeConfig::default());
        let fallback = fallback_facade();
        let corpus = sample_corpus(DEFAULT_SEED, 512);

        let mismatches = compare_backends(accelerated.backend(), fallback.backend(), &corpus);
        assert!(mismatches.is_empty(), "mismatches: {:#?}", mismatches);
    }

    #[test]
    fn test_only_hello_differs() {
        let accelerated = Facade::resolve(&FacadeConfig::default());
        let fallback = fallback_facade();
        assert_ne!(accelerated.hello(), fallback.hello());
        assert_eq!(
            accelerated.invoke_json("power", "[3, 4]").unwrap(),
            fallback.invoke_json("power", "[3, 4]").unwrap()
        );
    }
}
