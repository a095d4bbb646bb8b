use super::*;
use crate::component::Comp;
use crate::test_util::{self, Circle, Position, Shape, Velocity};

fn new_registry(name: &str) -> Registry {
    test_util::init();
    Registry::builder().name(name).eligible_as_main(false).build()
}

#[test]
fn test_add_rejects_duplicates() {
    let registry = new_registry("dedup");
    let comp = Comp::detached(Position(1));

    registry.add(&comp).expect("first add succeeds");
    assert_eq!(
        registry.add(&comp),
        Err(Error::DuplicateRegistration {
            component: any::type_name::<Position>(),
            registry:  "dedup".to_string(),
        })
    );
    assert_eq!(
        registry.add(&comp.erase()),
        Err(Error::DuplicateRegistration {
            component: any::type_name::<Position>(),
            registry:  "dedup".to_string(),
        }),
        "identity does not depend on the handle type"
    );
    assert_eq!(registry.len_of::<Position>(), 1);

    Comp::new_in(&registry, Position(1)).expect("equal values are distinct components");
    assert_eq!(registry.len_of::<Position>(), 2);
}

#[test]
fn test_remove_unknown_type_fails() {
    let registry = new_registry("remove");
    let comp = Comp::detached(Velocity(1));

    assert_eq!(
        registry.remove(&comp),
        Err(Error::NotRegistered {
            component: any::type_name::<Velocity>(),
            registry:  "remove".to_string(),
        })
    );
}

#[test]
fn test_remove_after_type_is_known() {
    let registry = new_registry("remove");
    let added = Comp::new_in(&registry, Velocity(1)).expect("fresh component");
    let stranger = Comp::detached(Velocity(2));

    registry.remove(&stranger).expect("removing an absent instance of a known type is a no-op");
    assert_eq!(registry.len_of::<Velocity>(), 1);

    registry.remove(&added).expect("type is known");
    assert!(!registry.contains(&added));
    assert_eq!(registry.len_of::<Velocity>(), 0);

    registry.remove(&added).expect("the type stays known after its last instance is removed");

    registry.add(&added).expect("a removed component can be added again");
    assert!(registry.contains(&added));
}

#[test]
fn test_find_owner() {
    let first = new_registry("first");
    let second = new_registry("second");

    let a = Comp::new_in(&first, Position(1)).expect("fresh component");
    let b = Comp::new_in(&second, Position(2)).expect("fresh component");
    let orphan = Comp::detached(Position(3));

    assert_eq!(Registry::find_owner(&a), Some(first.clone()));
    assert_eq!(Registry::find_owner(&b), Some(second.clone()));
    assert_eq!(Registry::find_owner(&a.erase()), Some(first.clone()));
    assert_eq!(Registry::find_owner(&orphan), None);

    first.remove(&a).expect("type is known");
    assert_eq!(Registry::find_owner(&a), Some(first), "ownership outlives removal");
}

#[test]
fn test_report_change_requires_known_type() {
    let registry = new_registry("changes");
    let shape = Comp::detached(Shape::new("square"));

    assert_eq!(
        registry.report_change(&shape),
        Err(Error::NotRegistered {
            component: any::type_name::<Shape>(),
            registry:  "changes".to_string(),
        })
    );

    // a supertype instance does not make the subtype known
    registry.add(&shape).expect("fresh component");
    let circle = Comp::detached(Circle::new("circle", 1));
    assert!(registry.report_change(&circle).is_err());

    registry.report_change(&shape).expect("Shape is known");
    registry.report_change(&shape).expect("Shape is known");
    assert_eq!(registry.pending_changes(Channel::Sync), 1);
    assert_eq!(registry.pending_changes(Channel::Async), 1);
}

#[test]
fn test_builder_names() {
    test_util::init();

    let named = Registry::builder().name("physics").eligible_as_main(false).build();
    assert_eq!(named.name(), "physics");
    assert_eq!(format!("{named:?}"), r#"Registry { name: "physics", .. }"#);

    let anonymous = Registry::builder().eligible_as_main(false).build();
    assert!(anonymous.name().starts_with("registry#"), "got {}", anonymous.name());
}

#[test]
fn test_handles_compare_by_identity() {
    let registry = new_registry("identity");
    let clone = registry.clone();
    let other = new_registry("identity");

    assert_eq!(registry, clone);
    assert_ne!(registry, other);
}

#[test]
fn test_add_rejects_component_owned_elsewhere() {
    let first = new_registry("first");
    let second = new_registry("second");
    let comp = Comp::new_in(&first, Position(1)).expect("fresh component");

    let owned_by_first = Err(Error::OwnedElsewhere {
        component: any::type_name::<Position>(),
        owner:     "first".to_string(),
        registry:  "second".to_string(),
    });
    assert_eq!(second.add(&comp), owned_by_first);
    assert!(!second.contains(&comp));

    first.remove(&comp).expect("type is known");
    assert_eq!(second.add(&comp), owned_by_first, "removal does not release ownership");
    assert_eq!(second.len_of::<Position>(), 0);

    comp.mark_changed().expect("owned by first");
    assert_eq!(first.pending_changes(Channel::Sync), 1);
    assert_eq!(second.pending_changes(Channel::Sync), 0);

    first.add(&comp).expect("the owner may add the component again");
    assert_eq!(Registry::find_owner(&comp), Some(first));
}

#[test]
fn test_dropped_owner_releases_component() {
    let first = new_registry("first");
    let second = new_registry("second");
    let comp = Comp::new_in(&first, Velocity(1)).expect("fresh component");

    drop(first);
    second.add(&comp).expect("no live registry owns the component");
    assert_eq!(comp.owner(), Some(second));
}

#[test]
fn test_concurrent_claims_have_one_winner() {
    for _ in 0..100 {
        let first = new_registry("first");
        let second = new_registry("second");
        let comp = Comp::detached(Position(1));

        let (a, b) = rayon::join(|| first.add(&comp), || second.add(&comp));
        let winner = match (a, b) {
            (Ok(()), Err(Error::OwnedElsewhere { .. })) => first.clone(),
            (Err(Error::OwnedElsewhere { .. }), Ok(())) => second.clone(),
            results => panic!("expected exactly one claim to succeed, got {results:?}"),
        };
        assert_eq!(Registry::find_owner(&comp), Some(winner.clone()));
        assert_eq!(first.contains(&comp) as usize + second.contains(&comp) as usize, 1);
        assert!(winner.contains(&comp));
    }
}
