//! The well-known member catalog and its cache.

use crate::{ClassHandle, HostRuntime, MethodHandle};
use cxrec_types::{RecorderError, Result};
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::fmt;

/// A (class, method, signature) triple the recorder resolves reflectively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Member {
    /// Internal name of the owning class, e.g. `java/lang/Thread`.
    pub class_name: &'static str,
    /// Member name.
    pub name: &'static str,
    /// Member type signature.
    pub signature: &'static str,
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.class_name, self.name)
    }
}

/// The fixed catalog of members the formatters and the thread-identity
/// resolver need.
pub mod members {
    use super::Member;

    /// `Thread.getId()`, the numeric-id accessor.
    pub const THREAD_GET_ID: Member = Member {
        class_name: "java/lang/Thread",
        name: "getId",
        signature: "()J",
    };

    /// `Object.toString()`.
    pub const OBJECT_TO_STRING: Member = Member {
        class_name: "java/lang/Object",
        name: "toString",
        signature: "()Ljava/lang/String;",
    };

    /// `StringWriter()`, the in-memory text buffer constructor.
    pub const STRING_WRITER_NEW: Member = Member {
        class_name: "java/io/StringWriter",
        name: "<init>",
        signature: "()V",
    };

    /// `PrintWriter(Writer)`.
    pub const PRINT_WRITER_NEW: Member = Member {
        class_name: "java/io/PrintWriter",
        name: "<init>",
        signature: "(Ljava/io/Writer;)V",
    };

    /// `Throwable.printStackTrace(PrintWriter)`.
    pub const THROWABLE_PRINT_STACK_TRACE: Member = Member {
        class_name: "java/lang/Throwable",
        name: "printStackTrace",
        signature: "(Ljava/io/PrintWriter;)V",
    };

    /// Every catalog entry, in resolution order.
    pub const CATALOG: &[Member] = &[
        THREAD_GET_ID,
        OBJECT_TO_STRING,
        STRING_WRITER_NEW,
        PRINT_WRITER_NEW,
        THROWABLE_PRINT_STACK_TRACE,
    ];
}

/// A catalog member resolved to host handles.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedMember {
    /// The owning class.
    pub class: ClassHandle,
    /// The member itself.
    pub method: MethodHandle,
}

/// How [`ReflectionCache`] treats resolved handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePolicy {
    /// Resolve on every call. Always correct, slightly slower.
    Fresh,
    /// Resolve once per catalog slot and keep the handles. Valid because
    /// the host keeps class and method handles for core system types
    /// stable once loaded.
    #[default]
    Memoize,
}

/// Resolves catalog members through the host, optionally memoizing.
///
/// Population is idempotent: two threads racing on the same slot at
/// worst resolve it twice, and one result wins. A torn handle cannot be
/// observed.
pub struct ReflectionCache {
    policy: CachePolicy,
    slots: HashMap<Member, OnceCell<ResolvedMember>>,
}

impl ReflectionCache {
    /// Create a cache with the given policy.
    pub fn new(policy: CachePolicy) -> Self {
        let slots = members::CATALOG
            .iter()
            .map(|member| (*member, OnceCell::new()))
            .collect();
        Self { policy, slots }
    }

    /// The active policy.
    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// Resolve a member to host handles, honoring the cache policy.
    ///
    /// Members outside the catalog are resolved fresh regardless of
    /// policy.
    pub fn resolve(&self, host: &dyn HostRuntime, member: Member) -> Result<ResolvedMember> {
        match self.policy {
            CachePolicy::Fresh => lookup(host, member),
            CachePolicy::Memoize => match self.slots.get(&member) {
                Some(slot) => slot.get_or_try_init(|| lookup(host, member)).copied(),
                None => lookup(host, member),
            },
        }
    }
}

impl Default for ReflectionCache {
    fn default() -> Self {
        Self::new(CachePolicy::default())
    }
}

fn lookup(host: &dyn HostRuntime, member: Member) -> Result<ResolvedMember> {
    let class = host
        .find_class(member.class_name)
        .map_err(|_| RecorderError::resolution(member.to_string()))?;
    let method = host
        .method_id(class, member.name, member.signature)
        .map_err(|_| RecorderError::resolution(member.to_string()))?;
    Ok(ResolvedMember { class, method })
}
