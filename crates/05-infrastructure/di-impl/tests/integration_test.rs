//! 依赖注入实现的集成测试

use di_abstractions::{
    ContainerBuilder, ContainerConfig, Definition, DefinitionMap, DiContainer, FactoryRegistry,
    Resolver, ResolverExt,
};
use di_impl::{CompiledContainer, DiContainerBuilder, ProxyManifest, COMPILED_FILE_NAME, PROXIES_FILE_NAME};
use infrastructure_common::DependencyError;
use std::error::Error;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};

static INIT_LOGGER: Once = Once::new();

fn init_test_logger() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("debug")
            .try_init()
            .ok();
    });
}

/// 测试服务
#[derive(Debug)]
struct Logger {
    channel: String,
}

#[derive(Debug)]
struct Mailer {
    logger: Arc<Logger>,
}

fn factories() -> FactoryRegistry {
    let mut factories = FactoryRegistry::new();
    factories
        .register("app.logger", |_| {
            Ok(Logger {
                channel: "app".to_string(),
            })
        })
        .register("app.mailer", |resolver| {
            Ok(Mailer {
                logger: resolver.get_as::<Logger>("logger")?,
            })
        });
    factories
}

fn definitions() -> DefinitionMap {
    DefinitionMap::new()
        .with("logger", Definition::factory("app.logger"))
        .with("mailer", Definition::factory("app.mailer"))
        .with("log", Definition::alias("logger"))
        .with("app.name", Definition::value("demo"))
}

fn container() -> di_impl::DiContainerImpl {
    init_test_logger();
    DiContainerBuilder::new()
        .add_definitions(definitions())
        .with_factories(factories())
        .build()
        .unwrap()
}

/// 测试共享定义返回同一实例，make 返回新实例
#[test]
fn test_shared_and_fresh_resolution() {
    let container = container();

    let first = container.get_as::<Logger>("logger").unwrap();
    let second = container.get_as::<Logger>("logger").unwrap();
    assert!(Arc::ptr_eq(&first, &second), "共享定义应该返回同一实例");

    let fresh = container.make_as::<Logger>("logger").unwrap();
    assert!(!Arc::ptr_eq(&first, &fresh), "make 应该返回新实例");
    assert_eq!(fresh.channel, "app");
    assert_eq!(container.shared_instance_count(), 1);
}

/// 测试工厂通过解析器获取依赖，别名解析到目标的共享实例
#[test]
fn test_factory_dependencies_and_aliases() {
    let container = container();

    let mailer = container.get_as::<Mailer>("mailer").unwrap();
    let logger = container.get_as::<Logger>("log").unwrap();

    assert!(Arc::ptr_eq(&mailer.logger, &logger));
}

/// 测试非共享工厂每次 get 都构造新实例
#[test]
fn test_non_shared_factory() {
    init_test_logger();
    let counter = Arc::new(AtomicUsize::new(0));
    let calls = Arc::clone(&counter);

    let container = DiContainerBuilder::new()
        .add_definitions(DefinitionMap::new().with(
            "request",
            Definition::func(move |_| {
                let id = calls.fetch_add(1, Ordering::SeqCst);
                Ok(Arc::new(id))
            })
            .shared(false),
        ))
        .build()
        .unwrap();

    let a = container.get_as::<usize>("request").unwrap();
    let b = container.get_as::<usize>("request").unwrap();
    assert_ne!(*a, *b);
    assert_eq!(counter.load(Ordering::SeqCst), 2);
    assert_eq!(container.shared_instance_count(), 0);
}

/// 测试字面量定义：get 返回同一实例，make 返回副本
#[test]
fn test_value_definitions() {
    let container = container();

    let a = container.get_as::<serde_json::Value>("app.name").unwrap();
    let b = container.get_as::<serde_json::Value>("app.name").unwrap();
    let c = container.make_as::<serde_json::Value>("app.name").unwrap();

    assert!(Arc::ptr_eq(&a, &b));
    assert!(!Arc::ptr_eq(&a, &c));
    assert_eq!(*c, serde_json::json!("demo"));
}

/// 测试 has 不触发解析
#[test]
fn test_has_does_not_resolve() {
    let container = container();

    assert!(container.has("logger").unwrap());
    assert!(container.has("log").unwrap());
    assert!(!container.has("unknown").unwrap());
    assert_eq!(container.shared_instance_count(), 0);
}

/// 测试解析未定义的名称
#[test]
fn test_unknown_name() {
    let container = container();

    let result = container.get("unknown");
    assert!(matches!(
        result,
        Err(DependencyError::ComponentNotRegistered { ref name }) if name == "unknown"
    ));
}

/// 测试类型不匹配
#[test]
fn test_downcast_failure() {
    let container = container();

    let result = container.get_as::<Mailer>("logger");
    assert!(matches!(result, Err(DependencyError::DowncastFailed { .. })));
}

/// 测试工厂之间的循环依赖
#[test]
fn test_factory_cycle_is_detected() {
    init_test_logger();
    let container = DiContainerBuilder::new()
        .add_definitions(
            DefinitionMap::new()
                .with("a", Definition::func(|resolver| Ok(resolver.get("b")?)))
                .with("b", Definition::func(|resolver| Ok(resolver.get("a")?))),
        )
        .build()
        .unwrap();

    match container.get("a") {
        Err(DependencyError::CircularDependency { dependency_chain }) => {
            assert_eq!(dependency_chain, "a -> b -> a");
        }
        other => panic!("期望循环依赖错误, 实际: {:?}", other.map(|_| ())),
    }
    assert_eq!(container.shared_instance_count(), 0);
}

/// 测试工厂失败时保留原始错误
#[test]
fn test_factory_failure_keeps_source() {
    init_test_logger();
    let container = DiContainerBuilder::new()
        .add_definitions(DefinitionMap::new().with(
            "db",
            Definition::func(|_| Err(anyhow::anyhow!("connection refused"))),
        ))
        .build()
        .unwrap();

    let error = container.get("db").unwrap_err();
    assert!(matches!(error, DependencyError::ComponentCreationFailed { ref name, .. } if name == "db"));
    assert_eq!(error.source().unwrap().to_string(), "connection refused");
}

/// 测试解析深度上限
#[test]
fn test_resolution_depth_limit() {
    init_test_logger();
    let mut definitions = DefinitionMap::new();
    for i in 0..10 {
        definitions.insert(format!("level{}", i), Definition::alias(format!("level{}", i + 1)));
    }
    definitions.insert("level10", Definition::value(10));

    let container = DiContainerBuilder::new()
        .with_config(ContainerConfig {
            max_resolution_depth: 5,
            ..ContainerConfig::default()
        })
        .add_definitions(definitions)
        .build()
        .unwrap();

    assert!(matches!(
        container.get("level0"),
        Err(DependencyError::ResolutionDepthExceeded { max_depth: 5, .. })
    ));
    assert!(container.get("level7").is_ok());
}

/// 测试自动装配：未定义的名称回退到同名工厂
#[test]
fn test_autowiring_falls_back_to_registered_factories() {
    init_test_logger();
    let mut registry = FactoryRegistry::new();
    registry.register("clock", |_| Ok(42_u64));

    let disabled = DiContainerBuilder::new()
        .with_factories(registry.clone())
        .build()
        .unwrap();
    assert!(!disabled.has("clock").unwrap());

    let enabled = DiContainerBuilder::new()
        .with_config(ContainerConfig {
            use_autowiring: true,
            ..ContainerConfig::default()
        })
        .with_factories(registry)
        .build()
        .unwrap();
    assert!(enabled.has("clock").unwrap());
    assert_eq!(*enabled.get_as::<u64>("clock").unwrap(), 42);
    assert!(enabled.definitions().is_empty());
}

/// 测试并发解析共享定义时只保留一个实例
#[test]
fn test_concurrent_shared_resolution() {
    let container = Arc::new(container());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let container = Arc::clone(&container);
            std::thread::spawn(move || container.get_as::<Logger>("logger").unwrap())
        })
        .collect();

    let instances: Vec<Arc<Logger>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(instances.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
}

/// 测试编译输出与代理清单写入
#[test]
fn test_compilation_and_proxies_output() {
    init_test_logger();
    let dir = tempfile::TempDir::new().unwrap();

    DiContainerBuilder::new()
        .with_config(ContainerConfig {
            enable_compilation: true,
            compile_to: Some(dir.path().join("compiled")),
            enable_writing_proxies: true,
            write_proxies_to: Some(dir.path().join("proxies")),
            ..ContainerConfig::default()
        })
        .add_definitions(definitions())
        .with_factories(factories())
        .build()
        .unwrap();

    let compiled: CompiledContainer = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("compiled").join(COMPILED_FILE_NAME)).unwrap(),
    )
    .unwrap();
    assert_eq!(compiled.definitions.len(), 4);

    let proxies: ProxyManifest = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("proxies").join(PROXIES_FILE_NAME)).unwrap(),
    )
    .unwrap();
    assert_eq!(proxies.proxies, vec!["logger".to_string(), "mailer".to_string()]);
}

/// 测试输出目录不可写时构建失败
#[test]
fn test_unwritable_output_fails_build() {
    init_test_logger();
    let dir = tempfile::TempDir::new().unwrap();
    let blocker = dir.path().join("file");
    std::fs::write(&blocker, "not a directory").unwrap();

    let result = DiContainerBuilder::new()
        .with_config(ContainerConfig {
            enable_compilation: true,
            compile_to: Some(blocker.join("nested")),
            ..ContainerConfig::default()
        })
        .add_definitions(definitions())
        .with_factories(factories())
        .build();

    assert!(matches!(result, Err(DependencyError::OutputWriteFailed { .. })));
}
