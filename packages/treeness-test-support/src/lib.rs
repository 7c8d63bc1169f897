//! Fixtures shared by the treeness integration suites: sample entity types,
//! the canonical sample tree, structural snapshots and test logging.

use std::env;
use std::sync::Once;

use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use treeness_core::{
    Attribute, Describable, Forest, ForestConfig, Gps, HasGps, HasStreetAddress, Hierarchical,
    Identifiable, NodeId, PropertySource, PropertyValue, StreetAddress, Versionable,
};

static TRACING: Once = Once::new();

/// Install a test-writer subscriber once per test process. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .with_target(true)
                .with_test_writer()
                .with_filter(filter),
        );
        if tracing::dispatcher::has_been_set() {
            debug!("tracing subscriber already set");
        } else if let Err(e) = subscriber.try_init() {
            eprintln!("failed to set up test logging: {e}");
        }
        debug!(rust_log = ?env::var("RUST_LOG").ok(), "test logging ready");
    });
}

/// Organizational unit: the workhorse fixture. `code` is an extra property
/// that several units may share.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrgUnit {
    pub id: Option<String>,
    pub name: String,
    pub code: Option<String>,
}

impl OrgUnit {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: Some(id.to_owned()),
            name: name.to_owned(),
            code: None,
        }
    }

    /// Unit without an id; only handle identity tells two of these apart.
    pub fn anonymous(name: &str) -> Self {
        Self {
            id: None,
            name: name.to_owned(),
            code: None,
        }
    }

    pub fn with_code(mut self, code: &str) -> Self {
        self.code = Some(code.to_owned());
        self
    }
}

impl Identifiable for OrgUnit {
    type Id = String;

    fn id(&self) -> Option<&String> {
        self.id.as_ref()
    }
}

impl PropertySource for OrgUnit {
    fn property(&self, name: &str) -> Option<PropertyValue> {
        match name {
            "id" => self.id.clone().map(PropertyValue::from),
            "name" => Some(self.name.as_str().into()),
            "code" => self.code.clone().map(PropertyValue::from),
            _ => None,
        }
    }
}

/// Geographic region carrying every attribute capability.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Region {
    pub id: u32,
    description: Attribute<String>,
    gps: Attribute<Gps>,
    address: Attribute<StreetAddress>,
    version: Attribute<u64>,
}

impl Region {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }
}

impl Identifiable for Region {
    type Id = u32;

    fn id(&self) -> Option<&u32> {
        Some(&self.id)
    }
}

impl Describable for Region {
    fn description_attribute(&self) -> &Attribute<String> {
        &self.description
    }

    fn description_attribute_mut(&mut self) -> &mut Attribute<String> {
        &mut self.description
    }
}

impl HasGps for Region {
    fn gps_attribute(&self) -> &Attribute<Gps> {
        &self.gps
    }

    fn gps_attribute_mut(&mut self) -> &mut Attribute<Gps> {
        &mut self.gps
    }
}

impl HasStreetAddress for Region {
    fn street_address_attribute(&self) -> &Attribute<StreetAddress> {
        &self.address
    }

    fn street_address_attribute_mut(&mut self) -> &mut Attribute<StreetAddress> {
        &mut self.address
    }
}

impl Versionable for Region {
    fn version_attribute(&self) -> &Attribute<u64> {
        &self.version
    }

    fn version_attribute_mut(&mut self) -> &mut Attribute<u64> {
        &mut self.version
    }
}

/// Handles of the canonical sample tree:
///
/// ```text
/// r
/// ├── a
/// │   └── c
/// └── b
/// ```
#[derive(Clone, Copy, Debug)]
pub struct SampleTree {
    pub r: NodeId<OrgUnit>,
    pub a: NodeId<OrgUnit>,
    pub b: NodeId<OrgUnit>,
    pub c: NodeId<OrgUnit>,
}

pub fn sample_tree() -> (Forest<OrgUnit>, SampleTree) {
    sample_tree_with(ForestConfig::default())
}

pub fn sample_tree_with(config: ForestConfig) -> (Forest<OrgUnit>, SampleTree) {
    let mut forest = Forest::with_config(config);
    let r = forest.insert(OrgUnit::new("r", "Root"));
    let a = forest.insert(OrgUnit::new("a", "Alpha"));
    let b = forest.insert(OrgUnit::new("b", "Beta"));
    let c = forest.insert(OrgUnit::new("c", "Gamma"));

    forest.add_child(r, a).expect("attach a");
    forest.add_child(r, b).expect("attach b");
    forest.add_child(a, c).expect("attach c");
    (forest, SampleTree { r, a, b, c })
}

/// Linear chain of `len` units, first element at the top.
pub fn chain(forest: &mut Forest<OrgUnit>, len: usize) -> Vec<NodeId<OrgUnit>> {
    let nodes: Vec<_> = (0..len)
        .map(|i| forest.insert(OrgUnit::new(&format!("n{i}"), &format!("Node {i}"))))
        .collect();
    for pair in nodes.windows(2) {
        forest.set_parent(pair[1], pair[0]).expect("extend chain");
    }
    nodes
}

/// Structural state of one node: its parent and children.
pub type NodeSnapshot<T> = (NodeId<T>, Option<NodeId<T>>, Vec<NodeId<T>>);

/// Parent and children of every given node, for before/after comparisons.
pub fn snapshot<T>(forest: &Forest<T>, nodes: &[NodeId<T>]) -> Vec<NodeSnapshot<T>> {
    nodes
        .iter()
        .map(|&node| {
            (
                node,
                forest.parent(node).expect("live node"),
                forest.children(node).expect("live node"),
            )
        })
        .collect()
}

/// Entity names of `nodes`, in the given order.
pub fn names(forest: &Forest<OrgUnit>, nodes: &[NodeId<OrgUnit>]) -> Vec<String> {
    nodes
        .iter()
        .map(|&node| forest.entity(node).expect("live node").name.clone())
        .collect()
}
