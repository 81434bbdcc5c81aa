//! Fixups for instrument changes read from older format versions
//!
//! Each [`Migration`] applies to files older than its version. New fixups are
//! added to [`MIGRATIONS`]; the reader runs every entry that matches.

use super::ReadContext;
use crate::models::InstrumentChange;

/// First format version that applied staff transposition to instrument changes
pub const TRANSPOSITION_FIX_VERSION: u32 = 206;

pub struct Migration {
    /// Applies to files with a format version below this one
    pub before_version: u32,
    pub description: &'static str,
    pub apply: fn(&mut InstrumentChange, &ReadContext),
}

pub const MIGRATIONS: &[Migration] = &[Migration {
    before_version: TRANSPOSITION_FIX_VERSION,
    description: "inherit staff transposition",
    apply: inherit_staff_transposition,
}];

/// Run the migrations for `ctx.msc_version`, returning how many applied
pub fn migrate(ic: &mut InstrumentChange, ctx: &ReadContext) -> usize {
    let mut applied = 0;
    for migration in MIGRATIONS.iter().filter(|m| ctx.msc_version < m.before_version) {
        log::debug!(
            "Applying '{}' to instrument change at tick {} (version {})",
            migration.description,
            ctx.tick,
            ctx.msc_version
        );
        (migration.apply)(ic, ctx);
        applied += 1;
    }
    applied
}

/// Older files ignored the element's own transposition: the staff's
/// transposition stayed in effect. Emulate that, and treat the element as
/// already set up so that no propagation runs on top of the old layout.
///
/// Spelling damage those versions did to notes after the change is not
/// repaired here.
fn inherit_staff_transposition(ic: &mut InstrumentChange, ctx: &ReadContext) {
    ic.instrument_mut()
        .set_transpose(ctx.staff_transpose.unwrap_or_default());
    ic.mark_initialized();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngravingStyle;
    use crate::models::{Instrument, StaffId};
    use crate::transposition::Interval;

    fn context(msc_version: u32, staff_transpose: Option<Interval>) -> ReadContext {
        ReadContext {
            msc_version,
            staff: StaffId::new(0, 0),
            tick: 480,
            staff_transpose,
            style: EngravingStyle::default(),
        }
    }

    fn alto_sax() -> InstrumentChange {
        let instrument = Instrument::new("Alto Saxophone").with_transpose(Interval::new(-5, -9));
        InstrumentChange::new(StaffId::new(0, 0), 480, instrument, &EngravingStyle::default())
    }

    #[test]
    fn test_old_version_inherits_staff_transposition() {
        let mut ic = alto_sax();
        let applied = migrate(&mut ic, &context(205, Some(Interval::new(-1, -2))));
        assert_eq!(applied, 1);
        assert_eq!(ic.instrument().transpose(), Interval::new(-1, -2));
        assert!(ic.is_initialized());
    }

    #[test]
    fn test_old_version_without_staff_gets_no_transposition() {
        let mut ic = alto_sax();
        migrate(&mut ic, &context(114, None));
        assert_eq!(ic.instrument().transpose(), Interval::default());
    }

    #[test]
    fn test_threshold_version_is_untouched() {
        for version in [TRANSPOSITION_FIX_VERSION, 302, 400] {
            let mut ic = alto_sax();
            assert_eq!(migrate(&mut ic, &context(version, Some(Interval::default()))), 0);
            assert_eq!(ic.instrument().transpose(), Interval::new(-5, -9));
            assert!(!ic.is_initialized());
        }
    }
}
