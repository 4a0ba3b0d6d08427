//! The boundary to the host VM.
//!
//! Everything the recorder knows about the runtime it observes goes
//! through the [`HostRuntime`] trait: opaque handles in, `Result`s out.
//! On top of it sit the [`ReflectionCache`] for the small catalog of
//! well-known members the formatters need, and the thread-identity
//! resolver.

mod cache;
mod runtime;
mod thread;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::{members, CachePolicy, Member, ReflectionCache, ResolvedMember};
pub use runtime::{
    CallArg, ClassHandle, HostRuntime, MethodHandle, ObjectHandle, RawFrame, ThreadHandle,
};
pub use thread::resolve_thread_id;
