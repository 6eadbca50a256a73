//! Property-based tests for repository storage guarantees

use proptest::prelude::*;
use vk_shader_manager::store::{ShaderStore, SqliteShaderStore};
use vk_shader_manager::ShaderStage;

fn stage_strategy() -> impl Strategy<Value = ShaderStage> {
    prop::sample::select(ShaderStage::ALL.to_vec())
}

/// Stored bytes come back unchanged, whatever the name or content
#[test]
fn test_store_load_round_trip_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &("\\PC{0,64}", stage_strategy(), prop::collection::vec(any::<u8>(), 0..4096)),
            |(name, stage, code)| {
                let store = SqliteShaderStore::in_memory().unwrap();
                store.store(&name, stage, &code).unwrap();

                prop_assert_eq!(store.load(&name).unwrap(), code);
                prop_assert_eq!(store.query(&name).unwrap(), Some(stage));
                Ok(())
            },
        )
        .unwrap();
}

/// A second store under the same name replaces both stage and code
#[test]
fn test_upsert_overwrite_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(
                "[a-z]{1,16}\\.(vert|frag|comp)",
                (stage_strategy(), prop::collection::vec(any::<u8>(), 1..256)),
                (stage_strategy(), prop::collection::vec(any::<u8>(), 1..256)),
            ),
            |(name, (first_stage, first_code), (second_stage, second_code))| {
                let store = SqliteShaderStore::in_memory().unwrap();
                store.store(&name, first_stage, &first_code).unwrap();
                store.store(&name, second_stage, &second_code).unwrap();

                prop_assert_eq!(store.load(&name).unwrap(), second_code);
                prop_assert_eq!(store.query(&name).unwrap(), Some(second_stage));
                prop_assert_eq!(store.names().unwrap(), vec![name]);
                Ok(())
            },
        )
        .unwrap();
}

/// Names never stored are reported absent, and removing them is a no-op
#[test]
fn test_absent_name_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &("[a-z]{1,8}", "[A-Z]{1,8}"),
            |(stored, probe)| {
                let store = SqliteShaderStore::in_memory().unwrap();
                store.store(&stored, ShaderStage::Vertex, &[0; 4]).unwrap();

                prop_assert_eq!(store.query(&probe).unwrap(), None);
                prop_assert!(store.load(&probe).is_err());
                prop_assert!(!store.remove(&probe).unwrap());
                prop_assert_eq!(store.query(&stored).unwrap(), Some(ShaderStage::Vertex));
                Ok(())
            },
        )
        .unwrap();
}
