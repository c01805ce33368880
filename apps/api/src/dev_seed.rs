use flavorgate_core::{AppError, AppResult, TenantId};
use flavorgate_domain::{AccessGrant, Flavor, FlavorId, FlavorSpec};
use tracing::info;

use crate::api_services::FlavorStore;

struct SeedFlavor {
    id: i64,
    flavor_id: &'static str,
    name: &'static str,
    memory_mb: u32,
    vcpus: u32,
    root_gb: u32,
    is_public: bool,
}

const DEV_SEED_FLAVORS: [SeedFlavor; 4] = [
    SeedFlavor {
        id: 1,
        flavor_id: "0",
        name: "m1.tiny",
        memory_mb: 512,
        vcpus: 1,
        root_gb: 1,
        is_public: true,
    },
    SeedFlavor {
        id: 2,
        flavor_id: "1",
        name: "m1.small",
        memory_mb: 2048,
        vcpus: 1,
        root_gb: 20,
        is_public: true,
    },
    SeedFlavor {
        id: 3,
        flavor_id: "2",
        name: "m1.medium.private",
        memory_mb: 4096,
        vcpus: 2,
        root_gb: 40,
        is_public: false,
    },
    SeedFlavor {
        id: 4,
        flavor_id: "3",
        name: "m1.large.private",
        memory_mb: 8192,
        vcpus: 4,
        root_gb: 80,
        is_public: false,
    },
];

const DEV_SEED_GRANTS: [(&str, &str); 3] = [("2", "proj2"), ("2", "proj3"), ("3", "proj3")];

/// Seeds two public and two private flavors plus their tenant grants.
///
/// Safe to re-run; grants that already exist are left in place.
pub async fn run(store: &FlavorStore) -> AppResult<()> {
    for seed in &DEV_SEED_FLAVORS {
        let flavor = Flavor::new(
            seed.id,
            FlavorId::new(seed.flavor_id)?,
            seed.is_public,
            FlavorSpec {
                name: seed.name.to_owned(),
                memory_mb: seed.memory_mb,
                vcpus: seed.vcpus,
                root_gb: seed.root_gb,
                ephemeral_gb: 0,
                swap_mb: 0,
                rxtx_factor: 1.0,
            },
        )?;
        store.save_flavor(flavor).await?;
    }

    let repository = store.repository();
    let mut created = 0_usize;
    for (flavor_id, tenant_id) in DEV_SEED_GRANTS {
        let grant = AccessGrant::new(FlavorId::new(flavor_id)?, TenantId::new(tenant_id)?);
        match repository.insert_grant(&grant).await {
            Ok(_) => created += 1,
            Err(AppError::Conflict(_)) => {}
            Err(error) => return Err(error),
        }
    }

    info!(
        flavors = DEV_SEED_FLAVORS.len(),
        grants_created = created,
        "development flavor seed applied"
    );

    Ok(())
}
