use common::protocol::Asset;

/// Record kind marker stored on seeded assets.
pub const DOC_TYPE_ASSET: &str = "asset";

/// The assets written by [`super::AssetContract::init_ledger`].
pub fn sample_assets() -> Vec<Asset> {
    [
        ("asset1", "blue", 5, "Tomoko", 300),
        ("asset2", "red", 5, "Brad", 400),
        ("asset3", "green", 10, "Jin Soo", 500),
        ("asset4", "yellow", 10, "Max", 600),
        ("asset5", "black", 15, "Adriana", 700),
        ("asset6", "white", 15, "Michel", 800),
    ]
    .into_iter()
    .map(|(id, color, size, owner, value)| Asset {
        doc_type: Some(DOC_TYPE_ASSET.to_owned()),
        ..Asset::new(id, color, size, owner, value)
    })
    .collect()
}
