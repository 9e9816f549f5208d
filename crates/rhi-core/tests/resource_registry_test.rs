//! Integration test: ResourceRegistry
//!
//! Creation, typed lookup and destruction of registered resources, including
//! concurrent creation from several threads.
//!
//! Run with: cargo test --test resource_registry_test -- --nocapture

use std::collections::HashSet;
use std::sync::Arc;

use rhi_command::{ResourceHandle, ResourceType};
use rhi_core::ResourceRegistry;

#[test]
fn test_create_and_lookup() {
    let registry = ResourceRegistry::new();
    assert!(registry.is_empty());

    let texture = registry.create(ResourceType::Texture2D, "albedo");
    let buffer = registry.create(ResourceType::UniformBuffer, "per-frame constants");

    assert_eq!(texture.resource_id, 1);
    assert_eq!(buffer.resource_id, 2);
    assert_eq!(registry.len(), 2);

    let description = registry.get(&texture).expect("texture registered");
    assert_eq!(description.resource_type, ResourceType::Texture2D);
    assert_eq!(description.debug_name, "albedo");
    assert!(registry.contains(&buffer));
}

#[test]
fn test_null_handle_never_resolves() {
    let registry = ResourceRegistry::new();
    registry.create(ResourceType::Texture2D, "albedo");
    assert!(!registry.contains(&ResourceHandle::null()));
}

#[test]
fn test_mismatched_type_does_not_resolve() {
    let registry = ResourceRegistry::new();
    let texture = registry.create(ResourceType::Texture2D, "albedo");

    let forged = ResourceHandle::new(texture.resource_id, ResourceType::UniformBuffer);
    assert!(registry.get(&forged).is_none());
    assert!(registry.destroy(&forged).is_none());
    assert!(registry.contains(&texture));
}

#[test]
fn test_contains_typed() {
    let registry = ResourceRegistry::new();
    let texture = registry.create(ResourceType::TextureCube, "sky");

    assert!(registry.contains_typed(&texture, ResourceType::is_texture));
    assert!(!registry.contains_typed(&texture, ResourceType::is_buffer));
    assert!(!registry.contains_typed(&ResourceHandle::null(), ResourceType::is_texture));
}

#[test]
fn test_destroy() {
    let registry = ResourceRegistry::new();
    let pool = registry.create(ResourceType::QueryPool, "timestamps");

    let description = registry.destroy(&pool).expect("pool was live");
    assert_eq!(description.debug_name, "timestamps");
    assert!(!registry.contains(&pool));
    assert!(registry.destroy(&pool).is_none());
    assert!(registry.is_empty());

    // Ids are not reused
    let next = registry.create(ResourceType::QueryPool, "timestamps");
    assert_ne!(next.resource_id, pool.resource_id);
}

#[test]
fn test_concurrent_creation_yields_unique_ids() {
    let registry = Arc::new(ResourceRegistry::new());

    let workers: Vec<_> = (0..4)
        .map(|worker| {
            let registry = Arc::clone(&registry);
            std::thread::spawn(move || {
                (0..100)
                    .map(|i| {
                        registry
                            .create(ResourceType::VertexBuffer, &format!("worker {} buffer {}", worker, i))
                            .resource_id
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for worker in workers {
        for id in worker.join().expect("worker panicked") {
            assert!(ids.insert(id), "duplicate id {}", id);
        }
    }
    assert_eq!(ids.len(), 400);
    assert_eq!(registry.len(), 400);
}
