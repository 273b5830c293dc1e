//! Concurrency-guarded catalog storage.

use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{LoadError, NotFoundError};
use crate::product::Product;
use crate::snapshot::{JsonSnapshotDecoder, SnapshotDecoder, validate_products};

/// One immutable generation of the catalog.
///
/// Readers hold an `Arc<Catalog>` for as long as they need it; a reload swaps
/// in a new `Catalog` and never mutates an existing one.
#[derive(Debug, Default)]
pub struct Catalog {
    products: Vec<Product>,
    generation: u64,
    loaded_at: Option<DateTime<Utc>>,
}

/// Summary of the catalog currently being served.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogInfo {
    /// Number of successful loads so far; 0 for the initial empty catalog.
    pub generation: u64,
    pub product_count: usize,
    pub loaded_at: Option<DateTime<Utc>>,
}

impl Catalog {
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn info(&self) -> CatalogInfo {
        CatalogInfo {
            generation: self.generation,
            product_count: self.products.len(),
            loaded_at: self.loaded_at,
        }
    }

    /// First product with exactly this id, in snapshot order.
    pub fn find(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id().as_str() == id)
    }

    /// Products whose name or description contains `query`, ignoring case.
    pub fn matching<'a>(&'a self, query: &str) -> impl Iterator<Item = &'a Product> + use<'a> {
        let needle = query.to_lowercase();
        self.products
            .iter()
            .filter(move |p| p.matches_lowercase(&needle))
    }
}

/// The product catalog store.
///
/// Holds the current [`Catalog`] behind a read/write lock around an `Arc`
/// handle. Readers take the read lock only long enough to clone the handle, so
/// they never wait on each other, and a load takes the write lock only to swap
/// the handle. Build one at startup and share it (`Arc<CatalogStore>`) with
/// whatever serves requests.
#[derive(Debug)]
pub struct CatalogStore {
    current: RwLock<Arc<Catalog>>,
    decoder: Arc<dyn SnapshotDecoder>,
}

impl CatalogStore {
    /// Empty store decoding JSON snapshots.
    pub fn new() -> Self {
        Self::with_decoder(Arc::new(JsonSnapshotDecoder))
    }

    pub fn with_decoder(decoder: Arc<dyn SnapshotDecoder>) -> Self {
        Self {
            current: RwLock::new(Arc::new(Catalog::default())),
            decoder,
        }
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Read-only view of the current catalog.
    ///
    /// The view stays consistent even if a reload completes while it is held.
    pub fn snapshot(&self) -> Arc<Catalog> {
        // The guarded value is only ever replaced whole, so a poisoned lock
        // still holds a complete catalog.
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    pub fn info(&self) -> CatalogInfo {
        self.snapshot().info()
    }

    /// Every product, in storage order.
    pub fn list(&self) -> Vec<Product> {
        self.snapshot().products().to_vec()
    }

    /// First product whose id equals `id` exactly.
    pub fn get(&self, id: &str) -> Result<Product, NotFoundError> {
        self.snapshot()
            .find(id)
            .cloned()
            .ok_or_else(|| NotFoundError::new(id))
    }

    /// Products whose name or description contains `query` case-insensitively,
    /// in catalog order. An empty query returns the whole catalog.
    pub fn search(&self, query: &str) -> Vec<Product> {
        self.snapshot().matching(query).cloned().collect()
    }

    /// Replace the catalog with the decoded content of `snapshot`.
    ///
    /// On error the current catalog is left untouched.
    pub fn load(&self, snapshot: &[u8]) -> Result<CatalogInfo, LoadError> {
        self.load_with(self.decoder.as_ref(), snapshot)
    }

    /// Like [`CatalogStore::load`] with an explicit decoder for this snapshot.
    pub fn load_with(
        &self,
        decoder: &dyn SnapshotDecoder,
        snapshot: &[u8],
    ) -> Result<CatalogInfo, LoadError> {
        let products = match decoder
            .decode(snapshot)
            .and_then(|products| validate_products(&products).map(|()| products))
        {
            Ok(products) => products,
            Err(e) => {
                tracing::warn!(format = decoder.format(), error = %e, "rejected catalog snapshot");
                return Err(e);
            }
        };

        let info = self.swap(products);
        tracing::info!(
            generation = info.generation,
            products = info.product_count,
            format = decoder.format(),
            "catalog loaded"
        );
        Ok(info)
    }

    /// Read a snapshot file and load it.
    ///
    /// IO happens before the store is touched.
    pub fn load_from_path(&self, path: impl AsRef<Path>) -> Result<CatalogInfo, LoadError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            tracing::warn!(path = %path.display(), error = %e, "catalog snapshot unreadable");
            LoadError::io(path, e)
        })?;
        self.load(&bytes)
    }

    fn swap(&self, products: Vec<Product>) -> CatalogInfo {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let next = Arc::new(Catalog {
            products,
            generation: guard.generation + 1,
            loaded_at: Some(Utc::now()),
        });
        let info = next.info();
        *guard = next;
        info
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::Money;

    fn product(id: &str, name: &str, description: &str) -> Product {
        Product::new(
            id,
            name,
            description,
            format!("/static/img/products/{id}.jpg"),
            Money::new("USD", 1, 0).unwrap(),
            vec!["misc".to_string()],
        )
    }

    fn sunglasses() -> Product {
        Product::new(
            "OLJCESPC7Z",
            "Sunglasses",
            "Add a pop of color to your outfit with these sunglasses.",
            "/static/img/products/sunglasses.jpg",
            Money::new("USD", 19, 990_000_000).unwrap(),
            vec!["accessories".to_string()],
        )
    }

    fn encode(products: &[Product]) -> Vec<u8> {
        serde_json::to_vec(products).unwrap()
    }

    #[test]
    fn new_store_is_empty() {
        let store = CatalogStore::new();
        assert!(store.list().is_empty());
        assert!(store.search("").is_empty());
        assert_eq!(store.get("anything").unwrap_err(), NotFoundError::new("anything"));

        let info = store.info();
        assert_eq!(info.generation, 0);
        assert_eq!(info.product_count, 0);
        assert!(info.loaded_at.is_none());
    }

    #[test]
    fn sunglasses_scenario() {
        let store = CatalogStore::new();
        let json = r#"[{
            "id": "OLJCESPC7Z",
            "name": "Sunglasses",
            "description": "Add a pop of color to your outfit with these sunglasses.",
            "picture": "/static/img/products/sunglasses.jpg",
            "price": {"currency_code": "USD", "units": 19, "nanos": 990000000},
            "categories": ["accessories"]
        }]"#;
        store.load(json.as_bytes()).unwrap();

        assert_eq!(store.get("OLJCESPC7Z").unwrap(), sunglasses());
        assert_eq!(store.get("missing").unwrap_err().id, "missing");
        assert_eq!(store.search("sun"), vec![sunglasses()]);
        assert_eq!(store.search("SUN"), vec![sunglasses()]);
        assert!(store.search("xyz").is_empty());
    }

    #[test]
    fn list_preserves_snapshot_order() {
        let store = CatalogStore::new();
        let products = vec![
            product("c", "Candle", "smells nice"),
            product("a", "Apron", "for cooking"),
            product("b", "Bowl", "ceramic"),
        ];
        let info = store.load(&encode(&products)).unwrap();

        assert_eq!(info.generation, 1);
        assert_eq!(info.product_count, 3);
        assert!(info.loaded_at.is_some());
        assert_eq!(store.list(), products);
    }

    #[test]
    fn get_is_exact_and_case_sensitive() {
        let store = CatalogStore::new();
        store.load(&encode(&[sunglasses()])).unwrap();

        assert!(store.get("oljcespc7z").is_err());
        assert!(store.get("OLJCESPC7Z ").is_err());
        assert!(store.get("OLJCESPC").is_err());
        assert!(store.get("").is_err());
    }

    #[test]
    fn get_returns_first_duplicate() {
        let store = CatalogStore::new();
        let first = product("dup", "First", "one");
        let second = product("dup", "Second", "two");
        store.load(&encode(&[first.clone(), second])).unwrap();

        assert_eq!(store.get("dup").unwrap(), first);
        assert_eq!(store.list().len(), 2);
    }

    #[test]
    fn search_matches_name_or_description_only() {
        let store = CatalogStore::new();
        let mug = product("MUG1", "Mug", "Holds coffee");
        let jar = product("JAR1", "Mason Jar", "Holds jam");
        let tie = product("TIE1", "Tie", "Formal wear");
        store.load(&encode(&[mug.clone(), jar.clone(), tie.clone()])).unwrap();

        assert_eq!(store.search("holds"), vec![mug.clone(), jar.clone()]);
        assert_eq!(store.search("JAR"), vec![jar.clone()]);
        assert_eq!(store.search(""), vec![mug, jar, tie]);
        // ids and categories are not searched
        assert!(store.search("TIE1").is_empty());
        assert!(store.search("misc").is_empty());
    }

    #[test]
    fn failed_load_keeps_previous_catalog() {
        let store = CatalogStore::new();
        let products = vec![sunglasses(), product("x", "Hat", "wool")];
        store.load(&encode(&products)).unwrap();
        let before = store.info();

        let err = store.load(b"[{\"id\": \"broken\"}]").unwrap_err();
        assert!(matches!(err, LoadError::MalformedData(_)));

        let mut bad_price = serde_json::to_value(&products).unwrap();
        bad_price[1]["price"]["nanos"] = serde_json::json!(-5);
        let err = store.load(&serde_json::to_vec(&bad_price).unwrap()).unwrap_err();
        assert!(matches!(err, LoadError::MalformedData(_)));

        assert_eq!(store.list(), products);
        assert_eq!(store.info(), before);
    }

    #[test]
    fn empty_id_and_blank_currency_load() {
        let store = CatalogStore::new();
        let snapshot = br#"[
            {"id": "A", "name": "Mug", "description": "", "picture": "",
             "price": {"currency_code": "", "units": 1, "nanos": 0}, "categories": []},
            {"id": "", "name": "Unnamed", "description": "no id", "picture": "",
             "price": {"currency_code": "USD", "units": 2, "nanos": 0}, "categories": []}
        ]"#;

        let info = store.load(snapshot).unwrap();
        assert_eq!(info.product_count, 2);
        assert_eq!(store.get("A").unwrap().price().currency_code, "");
        assert_eq!(store.get("").unwrap().name(), "Unnamed");
        assert_eq!(store.search("no id").len(), 1);
    }

    #[test]
    fn reload_replaces_whole_catalog() {
        let store = CatalogStore::new();
        store.load(&encode(&[product("a", "A", "a")])).unwrap();
        let held = store.snapshot();

        let info = store.load(&encode(&[product("b", "B", "b"), product("c", "C", "c")])).unwrap();
        assert_eq!(info.generation, 2);
        assert!(store.get("a").is_err());
        assert_eq!(store.list().len(), 2);

        // views taken before the reload are unaffected
        assert_eq!(held.len(), 1);
        assert!(held.find("a").is_some());
        assert_eq!(held.generation(), 1);
    }

    #[test]
    fn load_from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.json");
        std::fs::write(&path, encode(&[sunglasses()])).unwrap();

        let store = CatalogStore::new();
        let info = store.load_from_path(&path).unwrap();
        assert_eq!(info.product_count, 1);
        assert_eq!(store.get("OLJCESPC7Z").unwrap(), sunglasses());
    }

    #[test]
    fn load_from_missing_path_is_io_failure() {
        let dir = tempfile::tempdir().unwrap();
        let store = CatalogStore::new();
        store.load(&encode(&[sunglasses()])).unwrap();

        let err = store.load_from_path(dir.path().join("absent.json")).unwrap_err();
        match err {
            LoadError::IoFailure { path, source } => {
                assert!(path.ends_with("absent.json"));
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            _ => panic!("Expected IoFailure for missing snapshot"),
        }
        assert_eq!(store.list(), vec![sunglasses()]);
    }

    #[test]
    fn custom_decoder_is_used() {
        struct LinesDecoder;

        impl SnapshotDecoder for LinesDecoder {
            fn format(&self) -> &'static str {
                "lines"
            }

            fn decode(&self, bytes: &[u8]) -> Result<Vec<Product>, LoadError> {
                let text = std::str::from_utf8(bytes).map_err(|e| LoadError::malformed(e.to_string()))?;
                Ok(text
                    .lines()
                    .map(|line| Product::new(line, line, "", "", Money::new("USD", 0, 0).unwrap(), vec![]))
                    .collect())
            }
        }

        let store = CatalogStore::with_decoder(Arc::new(LinesDecoder));
        store.load(b"alpha\nbeta").unwrap();
        assert_eq!(store.list().len(), 2);
        assert_eq!(store.get("beta").unwrap().name(), "beta");

        // an empty line decodes to an empty id, which is still a product
        let info = store.load(b"ok\n\nafter-empty").unwrap();
        assert_eq!(info.product_count, 3);
        assert_eq!(store.get("").unwrap().id().as_str(), "");
        assert_eq!(store.get("after-empty").unwrap().name(), "after-empty");

        let json = encode(&[sunglasses()]);
        store.load_with(&JsonSnapshotDecoder, &json).unwrap();
        assert_eq!(store.list(), vec![sunglasses()]);
    }

    #[test]
    fn bundled_snapshot_loads() {
        let store = CatalogStore::new();
        let info = store.load(include_bytes!("../../../products.json")).unwrap();
        assert_eq!(info.product_count, 5);
        assert_eq!(store.get("OLJCESPC7Z").unwrap(), sunglasses());
    }

    #[test]
    fn readers_never_observe_mixed_catalogs() {
        let old: Vec<Product> = (0..50)
            .map(|i| product(&format!("old-{i}"), "Old", "previous"))
            .collect();
        let new: Vec<Product> = (0..80)
            .map(|i| product(&format!("new-{i}"), "New", "replacement"))
            .collect();
        let old_bytes = encode(&old);
        let new_bytes = encode(&new);

        let store = CatalogStore::new();
        store.load(&old_bytes).unwrap();

        std::thread::scope(|s| {
            s.spawn(|| {
                for i in 0..200 {
                    let bytes = if i % 2 == 0 { &new_bytes } else { &old_bytes };
                    store.load(bytes).unwrap();
                }
            });

            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..500 {
                        let seen = store.list();
                        assert!(seen == old || seen == new, "observed a mixed catalog of {} products", seen.len());

                        let found = store.search("");
                        assert!(found == old || found == new);
                    }
                });
            }
        });

        assert_eq!(store.info().generation, 201);
    }

    #[test]
    fn concurrent_loads_last_swap_wins() {
        let store = Arc::new(CatalogStore::new());
        let a = encode(&[product("a", "A", "a")]);
        let b = encode(&[product("b", "B", "b")]);

        std::thread::scope(|s| {
            s.spawn(|| store.load(&a).unwrap());
            s.spawn(|| store.load(&b).unwrap());
        });

        let ids: Vec<String> = store.list().iter().map(|p| p.id().to_string()).collect();
        assert!(ids == ["a"] || ids == ["b"], "unexpected merge: {ids:?}");
        assert_eq!(store.info().generation, 2);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn arb_product() -> impl Strategy<Value = Product> {
            (
                "[A-Z0-9]{1,6}",
                "[A-Za-z ]{0,12}",
                "[A-Za-z ]{0,24}",
                0i64..10_000,
                0i32..1_000_000_000,
            )
                .prop_map(|(id, name, description, units, nanos)| {
                    Product::new(
                        id,
                        name,
                        description,
                        "",
                        Money::new("USD", units, nanos).unwrap(),
                        vec![],
                    )
                })
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: list returns the snapshot's records in order.
            #[test]
            fn list_equals_snapshot(products in prop::collection::vec(arb_product(), 0..20)) {
                let store = CatalogStore::new();
                store.load(&encode(&products)).unwrap();
                prop_assert_eq!(store.list(), products);
            }

            /// Property: get(p.id) returns the first record carrying that id.
            #[test]
            fn get_returns_first_match(products in prop::collection::vec(arb_product(), 1..20)) {
                let store = CatalogStore::new();
                store.load(&encode(&products)).unwrap();
                for p in &products {
                    let id = p.id().as_str();
                    let expected = products.iter().find(|q| q.id().as_str() == id).unwrap();
                    prop_assert_eq!(&store.get(id).unwrap(), expected);
                }
                prop_assert!(store.get("lowercase-never-generated").is_err());
            }

            /// Property: search is the case-insensitive name/description filter of list.
            #[test]
            fn search_is_filter_of_list(
                products in prop::collection::vec(arb_product(), 0..20),
                query in "[A-Za-z ]{0,3}",
            ) {
                let store = CatalogStore::new();
                store.load(&encode(&products)).unwrap();

                let q = query.to_lowercase();
                let expected: Vec<Product> = store
                    .list()
                    .into_iter()
                    .filter(|p| p.name().to_lowercase().contains(&q) || p.description().to_lowercase().contains(&q))
                    .collect();
                prop_assert_eq!(store.search(&query), expected);
                prop_assert_eq!(store.search(""), store.list());
            }
        }
    }
}
