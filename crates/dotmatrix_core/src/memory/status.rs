use dotmatrix_common::Kind;

/// Diagnostic kinds for bus and register accesses.
///
/// Whether a kind is fatal depends on the operation that produced it:
/// `ProhibitedAddress` is a warning on an Echo RAM access that succeeded
/// against the mirrored WRAM but fatal when the mirror itself is
/// unreachable, and `ReadOnlyProhibited` is a warning on a synthetic read
/// but fatal on a dropped write.
#[derive(Clone, Copy, PartialEq, Eq, Debug, thiserror::Error)]
pub enum AccessKind {
    #[error("success")]
    Success,
    #[error("bank not in valid range")]
    InvalidBank,
    #[error("address not in valid range")]
    InvalidAddress,
    #[error("accessing prohibited address")]
    ProhibitedAddress,
    #[error("accessing read-only prohibited address")]
    ReadOnlyProhibited,
    #[error("access crosses region boundary")]
    CrossesRegionBoundary,
    #[error("register width does not match access width")]
    RegisterInvalidWidth,
    #[error("register overflowed")]
    RegisterOverflow,
}

impl Kind for AccessKind {
    const DEFAULT: Self = AccessKind::Success;

    fn description(&self) -> &'static str {
        match self {
            AccessKind::Success => "success",
            AccessKind::InvalidBank => "bank not in valid range",
            AccessKind::InvalidAddress => "address not in valid range",
            AccessKind::ProhibitedAddress => "accessing prohibited address",
            AccessKind::ReadOnlyProhibited => "accessing read-only prohibited address",
            AccessKind::CrossesRegionBoundary => "access crosses region boundary",
            AccessKind::RegisterInvalidWidth => "register width does not match access width",
            AccessKind::RegisterOverflow => "register overflowed",
        }
    }
}

/// Configuration diagnostics, produced by `initialize` only, never
/// mid-execution.
#[derive(Clone, Copy, PartialEq, Eq, Debug, thiserror::Error)]
pub enum SetupKind {
    #[error("success")]
    Success,
    #[error("ROM bank count not in valid set")]
    InvalidRomBankCount,
    #[error("VRAM bank count not in valid set")]
    InvalidVramBankCount,
    #[error("ERAM bank count not in valid set")]
    InvalidEramBankCount,
    #[error("WRAM bank count not in valid set")]
    InvalidWramBankCount,
    #[error("memory map is already initialized")]
    AlreadyInitialized,
    #[error("cartridge header is truncated")]
    HeaderTruncated,
}

impl Kind for SetupKind {
    const DEFAULT: Self = SetupKind::Success;

    fn description(&self) -> &'static str {
        match self {
            SetupKind::Success => "success",
            SetupKind::InvalidRomBankCount => "ROM bank count not in valid set",
            SetupKind::InvalidVramBankCount => "VRAM bank count not in valid set",
            SetupKind::InvalidEramBankCount => "ERAM bank count not in valid set",
            SetupKind::InvalidWramBankCount => "WRAM bank count not in valid set",
            SetupKind::AlreadyInitialized => "memory map is already initialized",
            SetupKind::HeaderTruncated => "cartridge header is truncated",
        }
    }
}
