//! Integration tests for asynchronous evaluation and the workspace.

use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use visflow::prelude::*;

struct Brighten {
    image: Arc<Image>,
    amount: f64,
    result: Option<Image>,
}

impl Process for Brighten {
    fn run(&mut self) -> Result<(), ProcessError> {
        let pixels = self
            .image
            .pixels()
            .iter()
            .map(|p| (p + self.amount).min(1.0))
            .collect();
        self.result = Image::from_pixels(self.image.width(), self.image.height(), pixels);
        Ok(())
    }
}

fn registry() -> ProcessRegistry {
    let mut registry = ProcessRegistry::new();
    registry.register(
        ProcessDescriptor::builder::<Brighten>("brighten")
            .input("image", ValueType::Image)
            .input("amount", ValueType::Double)
            .output("image", ValueType::Image, |p| {
                p.result.clone().map(Value::from).unwrap_or_default()
            })
            .build(|args| {
                Ok(Brighten {
                    image: args.image(0)?,
                    amount: args.double(1)?,
                    result: None,
                })
            })
            .unwrap(),
    );
    registry
}

fn brighten_network(registry: &ProcessRegistry, amount: serde_json::Value) -> Network {
    let mut network = Network::new();
    let input = network.add_node(SourceNode::with_output("image", Image::filled(2, 2, 0.25).unwrap()));
    let node = network.add_node(registry.create_node("brighten").unwrap());
    network.connect(node, "image", input, "image").unwrap();
    network
        .set_parameter(node, "amount", Value::from_json(&amount))
        .unwrap();
    network.set_output(node, "image").unwrap();
    network
}

fn driver() -> EvaluationDriver {
    EvaluationDriver::current(Arc::new(ConverterRegistry::default())).unwrap()
}

#[tokio::test]
async fn test_evaluate_returns_pending_value() {
    let network = Arc::new(brighten_network(&registry(), json!(0.5)));
    let value = driver().evaluate(network).await.unwrap();
    assert_eq!(value.as_image().unwrap().pixels(), &[0.75; 4]);
}

#[tokio::test]
async fn test_continuation_runs_after_value() {
    let network = Arc::new(brighten_network(&registry(), json!(1)));
    let seen = Arc::new(AtomicUsize::new(0));
    let counter = seen.clone();

    let width = driver()
        .evaluate(network)
        .then(move |value| {
            counter.fetch_add(1, Ordering::SeqCst);
            value.as_image().map(|img| img.width())
        })
        .await
        .unwrap();

    assert_eq!(width, Some(2));
    assert_eq!(seen.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_failure_reaches_the_handle() {
    let registry = registry();
    let mut network = Network::new();
    let node = network.add_node(registry.create_node("brighten").unwrap());
    network.set_output(node, "image").unwrap();

    let err = driver().evaluate(Arc::new(network)).await.unwrap_err();
    assert!(matches!(err, Error::UnresolvedInput { ref input, .. } if input == "image"));
}

#[tokio::test]
async fn test_workspace_swaps_network_only_after_success() {
    let registry = registry();
    let driver = driver();
    let workspace = Workspace::new(brighten_network(&registry, json!(0.0)));

    let broken = {
        let mut network = brighten_network(&registry, json!(0.0));
        let output = network.output().unwrap().node;
        network.remove_parameter(output, "amount").unwrap();
        network
    };
    assert!(workspace.open(&driver, broken).await.is_err());

    let installed = workspace
        .open(&driver, brighten_network(&registry, json!(0.25)))
        .await
        .unwrap();
    assert!(installed);

    let preview = workspace.preview(&driver).await.unwrap().unwrap();
    assert_eq!(preview.as_image().unwrap().pixels(), &[0.5; 4]);
}

#[tokio::test]
async fn test_latest_open_wins() {
    let registry = registry();
    let driver = driver();
    let workspace = Workspace::default();

    let first = workspace.open(&driver, brighten_network(&registry, json!(0.1)));
    let second = workspace.open(&driver, brighten_network(&registry, json!(0.5)));

    // The first open may land before the second finishes, never after it.
    let (first, second) = futures::join!(first, second);
    first.unwrap();
    assert!(second.unwrap());

    let value = workspace.preview(&driver).await.unwrap().unwrap();
    assert_eq!(value.as_image().unwrap().pixels(), &[0.75; 4]);
}
