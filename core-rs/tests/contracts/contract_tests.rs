//! Contract Tests - Expansion Invariant Protection
//!
//! This file aggregates all contract test modules.
//! Contract tests verify invariants that MUST NEVER BREAK.

// Contract test modules
mod contracts {
    // Template selection, provenance, isolation, apply modes
    mod expansion {
        include!("expansion_contracts.rs");
    }

    // Result combination laws
    mod merge {
        include!("merge_contracts.rs");
    }

    // Axiom store mutation failures
    mod store {
        include!("store_contracts.rs");
    }

    // Reasoner entry point guarantees
    mod reasoner {
        include!("reasoner_contracts.rs");
    }
}
