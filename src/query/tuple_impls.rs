#![allow(non_snake_case)]

use super::{Column, Fetch, Ref, Row};
use crate::component::{Component, ComponentType};

macro_rules! impl_fetch_for_tuple {
    ($arity:literal; $($idents:ident $getter:ident $index:tt),*) => {
        impl<$($idents: Component,)*> Fetch for ($($idents,)*) {
            const ARITY: usize = $arity;

            type Item = ($(Ref<$idents>,)*);

            fn types() -> Vec<ComponentType> { vec![$(ComponentType::of::<$idents>(),)*] }

            fn fetch(columns: &[Column], index: usize) -> Self::Item {
                ($(
                    Ref::<$idents>::from_slot(&columns[$index][index]),
                )*)
            }
        }

        impl<$($idents: Component,)*> Row<($($idents,)*)> {
            $(
                #[doc = concat!("Returns the slot of requested type number ", stringify!($index), " (zero-based).")]
                pub fn $getter(&self) -> &Ref<$idents> { &self.items.$index }
            )*
        }
    };
}

impl_fetch_for_tuple!(1; P1 get1 0);
impl_fetch_for_tuple!(2; P1 get1 0, P2 get2 1);
impl_fetch_for_tuple!(3; P1 get1 0, P2 get2 1, P3 get3 2);
impl_fetch_for_tuple!(4; P1 get1 0, P2 get2 1, P3 get3 2, P4 get4 3);
impl_fetch_for_tuple!(5; P1 get1 0, P2 get2 1, P3 get3 2, P4 get4 3, P5 get5 4);
