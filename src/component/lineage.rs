use std::marker::PhantomData;
use std::sync::Arc;

use super::{Component, ComponentType, Erased};

/// Views a value of some component type as one of its supertypes.
///
/// Returns `None` only if the input is not of the type the projection was built for.
pub(crate) type Projection = Arc<dyn Fn(&Erased) -> Option<&Erased> + Send + Sync>;

fn projection<F>(f: F) -> Projection
where
    F: for<'t> Fn(&'t Erased) -> Option<&'t Erased> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A transitive supertype of a component type.
#[derive(Clone)]
pub struct Ancestor {
    ty:                 ComponentType,
    depth:              usize,
    pub(crate) project: Projection,
}

impl Ancestor {
    /// The supertype.
    pub fn component_type(&self) -> ComponentType { self.ty }

    /// The number of `extends` steps from the subtype to this ancestor.
    pub fn depth(&self) -> usize { self.depth }
}

/// Collects the supertypes declared by a component type.
///
/// See [`Component::lineage`].
pub struct Lineage<C: Component> {
    /// The types currently being resolved, used to cut cycles.
    path:      Vec<ComponentType>,
    ancestors: Vec<Ancestor>,
    _ph:       PhantomData<fn() -> C>,
}

impl<C: Component> Lineage<C> {
    fn with_path(path: Vec<ComponentType>) -> Self {
        Self { path, ancestors: Vec::new(), _ph: PhantomData }
    }

    /// Resolves the transitive supertypes of `C`, nearest first.
    pub(crate) fn resolve() -> Vec<Ancestor> {
        let mut lineage = Self::with_path(vec![ComponentType::of::<C>()]);
        C::lineage(&mut lineage);
        lineage.ancestors
    }

    /// Declares `P` as a direct supertype of `C`.
    ///
    /// `upcast` borrows the `P` part of a `C`, usually an embedded field.
    /// The supertypes of `P` become supertypes of `C` as well.
    ///
    /// A declaration that would make a type its own ancestor is ignored with a warning.
    pub fn extends<P: Component>(&mut self, upcast: fn(&C) -> &P) -> &mut Self {
        let parent = ComponentType::of::<P>();
        if self.path.contains(&parent) {
            log::warn!(
                "Ignoring lineage declaration {} extends {} because it forms a cycle",
                ComponentType::of::<C>(),
                parent,
            );
            return self;
        }
        if self.ancestors.iter().any(|ancestor| ancestor.ty == parent) {
            return self;
        }

        let direct = projection(move |value| {
            value.downcast_ref::<C>().map(|value| upcast(value) as &Erased)
        });

        let mut parent_path = self.path.clone();
        parent_path.push(parent);
        let mut parent_lineage = Lineage::<P>::with_path(parent_path);
        P::lineage(&mut parent_lineage);

        self.ancestors.push(Ancestor { ty: parent, depth: 1, project: Arc::clone(&direct) });

        for grand in parent_lineage.ancestors {
            if self.ancestors.iter().any(|ancestor| ancestor.ty == grand.ty) {
                continue;
            }

            let first = Arc::clone(&direct);
            let rest = grand.project;
            self.ancestors.push(Ancestor {
                ty:      grand.ty,
                depth:   grand.depth + 1,
                project: projection(move |value| (*first)(value).and_then(|parent| (*rest)(parent))),
            });
        }

        self
    }
}
