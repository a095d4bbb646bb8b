//! Exposes testing, profiling and tracing capabilities.

use std::fmt;

use itertools::Itertools;

use crate::component::ComponentType;
use crate::system::{BindingKind, Channel};

/// Defines the [`Tracer`] trait and implements the [`Log`] and [`Aggregate`] types.
///
/// All tracer method parameters must be [`Copy`].
///
/// Use the `{@LOG_WITH = transformer}` syntax to transform an argument for log printing,
/// where `transformer` is an invokable that accepts the argument
/// and returns any [`fmt::Debug`] type.
macro_rules! define_tracer {
    (
        $(
            $(#[$meta:meta])*
            fn $name:ident(
                &self
                $(,$logged_ident:ident: $logged_ty:ty $({@LOG_WITH = $log_with:expr})?)*
                $(,)?
            );
        )*
    ) => {
        /// A tracer used for recording the events throughout a pass.
        ///
        /// Can be used for profiling and testing.
        pub trait Tracer: Sync {
            $(
                $(#[$meta])*
                #[allow(unused_variables)]
                fn $name(&self, $($logged_ident: $logged_ty,)*) {}
            )*
        }

        impl Tracer for Log {
            $(
                fn $name(&self, $($logged_ident: $logged_ty,)*) {
                    log::log!(self.0, concat!(stringify!($name), "(", $(
                        stringify!($logged_ident),
                        " = {",
                        stringify!($logged_ident),
                        ":?}, ",
                    )* ")"), $(
                        $logged_ident = define_tracer!(@LOG_EXPR $logged_ident $(@LOG_WITH = $log_with)?),
                    )*);
                }
            )*
        }

        impl_tuple_accumulate! {
            @TYPES (T1, T2, T3, T4, T5, T6, T7, T8);
            $(
                @VARS (t1, t2, t3, t4, t5, t6, t7, t8);
                @METHOD {fn $name(&self, $($logged_ident: $logged_ty,)*);}
            )*
        }
    };

    (@LOG_EXPR $ident:ident) => { $ident };
    (@LOG_EXPR $ident:ident @LOG_WITH = $closure:expr) => { ($closure)($ident) }
}

macro_rules! impl_tuple {
    (
        @TYPES ($($ty:ident),* $(,)?);
        $(
            @VARS ($($vars:ident),* $(,)?);
            @METHOD {fn $name:ident(&self, $($arg_ident:ident: $arg_ty:ty,)*);}
        )*
    ) => {
        impl<$($ty: Tracer),*> Tracer for Aggregate<($($ty,)*)> {
            $(
                fn $name(&self, $($arg_ident: $arg_ty),*) {
                    #[allow(unused_variables)]
                    let args = ($($arg_ident,)*);

                    #[allow(dead_code)]
                    fn call_with_args(tracer: &impl Tracer, &($($arg_ident,)*): &($($arg_ty,)*)) {
                        tracer.$name($($arg_ident,)*);
                    }

                    let Aggregate(($($vars,)*)) = self;
                    $(
                        call_with_args($vars, &args);
                    )*
                }
            )*
        }
    };
}

macro_rules! impl_tuple_accumulate {
    (@TYPES (); $(@VARS (); @METHOD {$($body:tt)*})*) => {
        impl_tuple! {
            @TYPES ();
            $(
                @VARS ();
                @METHOD {$($body)*}
            )*
        }
    };
    (
        @TYPES ($first_ty:ident $(, $rest_ty:ident)* $(,)?);
        $(
            @VARS ($first_var:ident $(, $rest_var:ident)* $(,)?);
            @METHOD {$($body:tt)*}
        )*
    ) => {
        impl_tuple! {
            @TYPES ($first_ty $(, $rest_ty)* );
            $(
                @VARS ($first_var $(, $rest_var)*);
                @METHOD {$($body)*}
            )*
        }

        impl_tuple_accumulate! {
            @TYPES ($($rest_ty),*);
            $(
                @VARS ($($rest_var),*);
                @METHOD {$($body)*}
            )*
        }
    };
}

define_tracer! {
    /// A pass of `channel` starts after swapping out `changes` pending changes.
    fn start_pass(&self, registry: &str, channel: Channel, changes: usize);

    /// A binding of a system has been resolved into a query of `rows` rows.
    fn bind(
        &self,
        channel: Channel,
        debug_name: &str,
        kind: BindingKind,
        types: &[ComponentType] {@LOG_WITH = TypeList},
        rows: usize,
    );

    /// A system starts running.
    fn start_run_system(&self, channel: Channel, debug_name: &str);

    /// A system stops running.
    fn end_run_system(&self, channel: Channel, debug_name: &str);

    /// A pass of `channel` completes after running `systems` systems.
    fn end_pass(&self, registry: &str, channel: Channel, systems: usize);
}

struct TypeList<'t>(&'t [ComponentType]);

impl<'t> fmt::Debug for TypeList<'t> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({})", self.0.iter().join(", "))
    }
}

/// An empty tracer.
pub struct Noop;

impl Tracer for Noop {}

/// Groups multiple tracers into a tuple and dispatches each call to them in serial.
pub struct Aggregate<T>(
    /// A tuple of child tracers to execute in serial.
    pub T,
);

/// A tracer that logs all events.
pub struct Log(
    /// The log level to log events with.
    pub log::Level,
);
