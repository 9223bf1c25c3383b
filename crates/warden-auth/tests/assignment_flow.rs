//! Assignment validation through the façade: mutex, cardinality, and
//! prerequisite constraints over collaborator-owned grant tables, plus
//! atomic constraint reload.

use std::collections::BTreeSet;
use std::sync::{Arc, OnceLock};

use rsa::pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::{RsaPrivateKey, RsaPublicKey};
use warden_auth::{
    AssignmentProposal, AssignmentStore, AssignmentSubject, AuthorizationFacade,
    MemoryAssignmentStore, MemoryDirectory, WardenConfig,
};
use warden_cache::MemoryCache;
use warden_core::{ConstraintId, DependencyError, PermissionId, PrincipalId, RoleId, WardenError};
use warden_rbac::{
    AssignmentDelta, Constraint, ConstraintKind, ConstraintRule, ConstraintSet, Decision,
    GrantRef, GrantUniverse,
};
use warden_vault::VaultConfig;

fn vault_config() -> VaultConfig {
    static CONFIG: OnceLock<VaultConfig> = OnceLock::new();
    CONFIG
        .get_or_init(|| {
            let mut rng = rand::rngs::OsRng;
            let private = RsaPrivateKey::new(&mut rng, 2048).expect("keygen");
            let public = RsaPublicKey::from(&private);
            VaultConfig {
                public_key_pem: public.to_public_key_pem(LineEnding::LF).unwrap(),
                private_key_pem: private.to_pkcs8_pem(LineEnding::LF).unwrap().to_string(),
            }
        })
        .clone()
}

/// Fixed role/permission universe shared by the scenarios.
struct Fixture {
    cashier: RoleId,
    auditor: RoleId,
    teller: RoleId,
    approve: PermissionId,
    submit: PermissionId,
    universe: GrantUniverse,
}

impl Fixture {
    fn new() -> Self {
        let cashier = RoleId::new();
        let auditor = RoleId::new();
        let teller = RoleId::new();
        let approve = PermissionId::new();
        let submit = PermissionId::new();
        Self {
            cashier,
            auditor,
            teller,
            approve,
            submit,
            universe: GrantUniverse {
                roles: BTreeSet::from([cashier, auditor, teller]),
                permissions: BTreeSet::from([approve, submit]),
            },
        }
    }
}

async fn facade_with(
    constraints: ConstraintSet,
    store: Arc<MemoryAssignmentStore>,
) -> AuthorizationFacade {
    AuthorizationFacade::new(
        WardenConfig::with_vault(vault_config()),
        Arc::new(MemoryCache::new()),
        Arc::new(MemoryDirectory::new()),
        store,
        constraints,
    )
    .expect("facade construction")
}

#[tokio::test]
async fn test_role_mutex_denied_through_facade() {
    let fx = Fixture::new();
    let constraints = ConstraintSet::load(
        vec![Constraint {
            id: ConstraintId::new(),
            rule: ConstraintRule::RoleMutex {
                group: BTreeSet::from([fx.cashier, fx.auditor]),
            },
        }],
        &fx.universe,
    )
    .unwrap();
    let store = Arc::new(MemoryAssignmentStore::new());
    let alice = PrincipalId::new();
    store
        .set_grants(
            AssignmentSubject::Principal(alice),
            BTreeSet::from([GrantRef::Role(fx.cashier)]),
        )
        .await;

    let facade = facade_with(constraints, Arc::clone(&store)).await;
    let decision = facade
        .propose_assignment(AssignmentProposal::Role {
            principal: alice,
            role: fx.auditor,
        })
        .await
        .unwrap();
    let Decision::Deny { violations } = decision else {
        panic!("expected denial");
    };
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].kind, ConstraintKind::RoleMutex);

    // The unconflicting role is still fine.
    let decision = facade
        .propose_assignment(AssignmentProposal::Role {
            principal: alice,
            role: fx.teller,
        })
        .await
        .unwrap();
    assert!(decision.is_allow());
}

#[tokio::test]
async fn test_swap_delta_clears_mutex_in_one_evaluation() {
    let fx = Fixture::new();
    let constraints = ConstraintSet::load(
        vec![Constraint {
            id: ConstraintId::new(),
            rule: ConstraintRule::RoleMutex {
                group: BTreeSet::from([fx.cashier, fx.auditor]),
            },
        }],
        &fx.universe,
    )
    .unwrap();
    let store = Arc::new(MemoryAssignmentStore::new());
    let alice = PrincipalId::new();
    store
        .set_grants(
            AssignmentSubject::Principal(alice),
            BTreeSet::from([GrantRef::Role(fx.cashier)]),
        )
        .await;

    let facade = facade_with(constraints, store).await;
    // Removing cashier and adding auditor in one delta: the post-state
    // holds one mutex member, so the swap is allowed.
    let delta = AssignmentDelta::granting(GrantRef::Role(fx.auditor))
        .revoke(GrantRef::Role(fx.cashier));
    let decision = facade
        .propose_change(AssignmentSubject::Principal(alice), &delta)
        .await
        .unwrap();
    assert!(decision.is_allow());
}

#[tokio::test]
async fn test_cardinality_limit_enforced() {
    let fx = Fixture::new();
    let scope: BTreeSet<_> = [fx.cashier, fx.auditor, fx.teller]
        .into_iter()
        .map(GrantRef::Role)
        .collect();
    let constraints = ConstraintSet::load(
        vec![Constraint {
            id: ConstraintId::new(),
            rule: ConstraintRule::Cardinality { scope, limit: 2 },
        }],
        &fx.universe,
    )
    .unwrap();
    let store = Arc::new(MemoryAssignmentStore::new());
    let alice = PrincipalId::new();
    store
        .set_grants(
            AssignmentSubject::Principal(alice),
            BTreeSet::from([GrantRef::Role(fx.cashier), GrantRef::Role(fx.auditor)]),
        )
        .await;

    let facade = facade_with(constraints, store).await;
    let decision = facade
        .propose_assignment(AssignmentProposal::Role {
            principal: alice,
            role: fx.teller,
        })
        .await
        .unwrap();
    let Decision::Deny { violations } = decision else {
        panic!("expected denial");
    };
    assert_eq!(violations[0].kind, ConstraintKind::Cardinality);
}

#[tokio::test]
async fn test_prerequisite_required_for_permission() {
    let fx = Fixture::new();
    let constraints = ConstraintSet::load(
        vec![Constraint {
            id: ConstraintId::new(),
            rule: ConstraintRule::Prerequisite {
                dependents: BTreeSet::from([GrantRef::Permission(fx.approve)]),
                required: BTreeSet::from([GrantRef::Permission(fx.submit)]),
            },
        }],
        &fx.universe,
    )
    .unwrap();
    let store = Arc::new(MemoryAssignmentStore::new());
    let facade = facade_with(constraints, Arc::clone(&store)).await;

    // Bare approve on an empty role: denied.
    let decision = facade
        .propose_assignment(AssignmentProposal::Permission {
            role: fx.cashier,
            permission: fx.approve,
        })
        .await
        .unwrap();
    let Decision::Deny { violations } = decision else {
        panic!("expected denial");
    };
    assert_eq!(violations[0].kind, ConstraintKind::Prerequisite);

    // Granting both in the same delta satisfies the prerequisite.
    let delta = AssignmentDelta::granting(GrantRef::Permission(fx.approve))
        .grant(GrantRef::Permission(fx.submit));
    let decision = facade
        .propose_change(AssignmentSubject::Role(fx.cashier), &delta)
        .await
        .unwrap();
    assert!(decision.is_allow());
}

#[tokio::test]
async fn test_contradictory_delta_is_validation_error() {
    let fx = Fixture::new();
    let facade = facade_with(
        ConstraintSet::default(),
        Arc::new(MemoryAssignmentStore::new()),
    )
    .await;
    let delta = AssignmentDelta::granting(GrantRef::Role(fx.cashier))
        .revoke(GrantRef::Role(fx.cashier));
    let err = facade
        .propose_change(AssignmentSubject::Principal(PrincipalId::new()), &delta)
        .await
        .unwrap_err();
    assert!(matches!(err, WardenError::Validation(_)));
}

#[tokio::test]
async fn test_reload_swaps_constraint_set() {
    let fx = Fixture::new();
    let store = Arc::new(MemoryAssignmentStore::new());
    let alice = PrincipalId::new();
    store
        .set_grants(
            AssignmentSubject::Principal(alice),
            BTreeSet::from([GrantRef::Role(fx.cashier)]),
        )
        .await;

    // Start with no constraints: the grant is allowed.
    let facade = facade_with(ConstraintSet::default(), Arc::clone(&store)).await;
    let proposal = AssignmentProposal::Role {
        principal: alice,
        role: fx.auditor,
    };
    assert!(facade.propose_assignment(proposal).await.unwrap().is_allow());

    // Load a mutex covering the pair; the same proposal is now denied.
    let tightened = ConstraintSet::load(
        vec![Constraint {
            id: ConstraintId::new(),
            rule: ConstraintRule::RoleMutex {
                group: BTreeSet::from([fx.cashier, fx.auditor]),
            },
        }],
        &fx.universe,
    )
    .unwrap();
    facade.reload_constraints(tightened).await;
    assert!(!facade.propose_assignment(proposal).await.unwrap().is_allow());
}

/// A store that never answers, for exercising the dependency bound.
struct StalledAssignments;

#[async_trait::async_trait]
impl AssignmentStore for StalledAssignments {
    async fn grants_for(
        &self,
        _subject: AssignmentSubject,
    ) -> Result<BTreeSet<GrantRef>, DependencyError> {
        std::future::pending().await
    }
}

#[tokio::test(start_paused = true)]
async fn test_stalled_store_surfaces_timeout_not_decision() {
    let fx = Fixture::new();
    let facade = AuthorizationFacade::new(
        WardenConfig::with_vault(vault_config()),
        Arc::new(MemoryCache::new()),
        Arc::new(MemoryDirectory::new()),
        Arc::new(StalledAssignments),
        ConstraintSet::default(),
    )
    .expect("facade construction");

    let err = facade
        .propose_assignment(AssignmentProposal::Role {
            principal: PrincipalId::new(),
            role: fx.cashier,
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        WardenError::Dependency(DependencyError::Timeout {
            dependency: "assignment-store",
            ..
        })
    ));
}

#[tokio::test]
async fn test_violations_reported_in_constraint_id_order() {
    let fx = Fixture::new();
    let mut ids = [ConstraintId::new(), ConstraintId::new()];
    ids.sort();
    let constraints = ConstraintSet::load(
        vec![
            Constraint {
                id: ids[1],
                rule: ConstraintRule::RoleMutex {
                    group: BTreeSet::from([fx.cashier, fx.auditor]),
                },
            },
            Constraint {
                id: ids[0],
                rule: ConstraintRule::Cardinality {
                    scope: BTreeSet::from([
                        GrantRef::Role(fx.cashier),
                        GrantRef::Role(fx.auditor),
                    ]),
                    limit: 1,
                },
            },
        ],
        &fx.universe,
    )
    .unwrap();
    let store = Arc::new(MemoryAssignmentStore::new());
    let alice = PrincipalId::new();
    store
        .set_grants(
            AssignmentSubject::Principal(alice),
            BTreeSet::from([GrantRef::Role(fx.cashier)]),
        )
        .await;

    let facade = facade_with(constraints, store).await;
    let decision = facade
        .propose_assignment(AssignmentProposal::Role {
            principal: alice,
            role: fx.auditor,
        })
        .await
        .unwrap();
    let Decision::Deny { violations } = decision else {
        panic!("expected denial");
    };
    assert_eq!(violations.len(), 2);
    assert_eq!(violations[0].constraint_id, ids[0]);
    assert_eq!(violations[1].constraint_id, ids[1]);
}
