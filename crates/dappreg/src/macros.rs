//! Crate-wide macros: logging, storable impls, and stable-memory registration.

// log
#[macro_export]
macro_rules! log {
    ($level:expr, $fmt:expr) => {{
        $crate::log!(@inner $level, $fmt,);
    }};

    // Match when additional arguments are provided
    ($level:expr, $fmt:expr, $($arg:tt)*) => {{
        $crate::log!(@inner $level, $fmt, $($arg)*);
    }};

    // Inner macro for actual logging logic to avoid code duplication
    (@inner $level:expr, $fmt:expr, $($arg:tt)*) => {{
        let formatted_message = format!($fmt, $($arg)*);

        let msg = match $level {
            $crate::Log::Ok => format!("\x1b[32mOK  \x1b[0m {}", formatted_message),
            $crate::Log::Info => format!("\x1b[34mINFO\x1b[0m {}", formatted_message),
            $crate::Log::Warn => format!("\x1b[33mWARN\x1b[0m {}", formatted_message),
            $crate::Log::Error => format!("\x1b[31mERR \x1b[0m {}", formatted_message),
        };

        $crate::cdk::println!("{}", msg);
    }};
}

/// Register a stable-memory id and return its `VirtualMemory` handle.
///
/// Registration is idempotent for the same type path; a clashing id is a
/// wiring bug and traps immediately rather than silently aliasing memory.
#[macro_export]
macro_rules! dappreg_register_memory {
    ($ty:ty, $id:expr) => {{
        let path = stringify!($ty).to_string();

        let result = $crate::memory::MemoryRegistry::register($id, &path);

        if let Err(ref err) = result {
            $crate::log!(
                $crate::Log::Error,
                "dappreg_register_memory failed for {} @ {}: {}",
                path,
                $id,
                err
            );
        }

        result.unwrap();

        // acquire memory_id
        $crate::memory::MEMORY_MANAGER
            .with_borrow_mut(|mgr| mgr.get($crate::cdk::structures::memory::MemoryId::new($id)))
    }};
}

// impl_storable_bounded
#[macro_export]
macro_rules! impl_storable_bounded {
    ($ident:ident, $max_size:expr, $is_fixed_size:expr) => {
        impl $crate::cdk::structures::storable::Storable for $ident {
            const BOUND: $crate::cdk::structures::storable::Bound =
                $crate::cdk::structures::storable::Bound::Bounded {
                    max_size: $max_size,
                    is_fixed_size: $is_fixed_size,
                };

            fn to_bytes(&self) -> ::std::borrow::Cow<'_, [u8]> {
                ::std::borrow::Cow::Owned($crate::serialize::serialize(self).unwrap())
            }

            fn into_bytes(self) -> Vec<u8> {
                $crate::serialize::serialize(&self).unwrap()
            }

            fn from_bytes(bytes: ::std::borrow::Cow<'_, [u8]>) -> Self {
                $crate::serialize::deserialize(&bytes).unwrap()
            }
        }
    };
}

// impl_storable_unbounded
#[macro_export]
macro_rules! impl_storable_unbounded {
    ($ident:ident) => {
        impl $crate::cdk::structures::storable::Storable for $ident {
            const BOUND: $crate::cdk::structures::storable::Bound =
                $crate::cdk::structures::storable::Bound::Unbounded;

            fn to_bytes(&self) -> ::std::borrow::Cow<'_, [u8]> {
                ::std::borrow::Cow::Owned($crate::serialize::serialize(self).unwrap())
            }

            fn into_bytes(self) -> Vec<u8> {
                $crate::serialize::serialize(&self).unwrap()
            }

            fn from_bytes(bytes: ::std::borrow::Cow<'_, [u8]>) -> Self {
                $crate::serialize::deserialize(&bytes).unwrap()
            }
        }
    };
}
