use tracing::{info, warn};

use crate::section::{Section, SectionEffect, effects_for};
use crate::state::ViewState;
use crate::surface::Surface;

/// Shows one section at a time and reports what entering it should trigger.
#[derive(Debug, Default, Clone, Copy)]
pub struct SectionRouter;

impl SectionRouter {
    /// Activates `name` and its nav button, deactivating all others.
    ///
    /// Unknown names and sections missing from the page are a no-op: nothing
    /// is deactivated and the previous section stays active. Effects are not
    /// deduplicated; showing the same section twice returns them twice.
    pub fn show<U: Surface + ?Sized>(
        state: &mut ViewState,
        surface: &mut U,
        name: &str,
    ) -> &'static [SectionEffect] {
        let Some(section) = Section::parse(name) else {
            warn!(name, "unknown section");
            return &[];
        };
        if !surface.has_section(section) {
            warn!(%section, "section container missing");
            return &[];
        }

        for s in Section::ALL {
            surface.set_section_active(s, false);
            surface.set_nav_active(s, false);
        }
        surface.set_section_active(section, true);
        surface.set_nav_active(section, true);
        state.active = Some(section);
        info!(%section, "showing section");
        effects_for(section)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::SectionRouter;
    use crate::recording::RecordingSurface;
    use crate::section::{Section, SectionEffect};
    use crate::state::ViewState;

    #[test]
    fn exactly_one_section_active() {
        let mut state = ViewState::default();
        let mut surface = RecordingSurface::new();
        for s in Section::ALL {
            SectionRouter::show(&mut state, &mut surface, s.as_str());
            assert_eq!(surface.active_sections(), vec![s]);
            assert_eq!(surface.active_nav(), vec![s]);
            assert_eq!(state.active, Some(s));
        }
    }

    #[test]
    fn unknown_name_keeps_previous_section() {
        let mut state = ViewState::default();
        let mut surface = RecordingSurface::new();
        SectionRouter::show(&mut state, &mut surface, "community");
        let effects = SectionRouter::show(&mut state, &mut surface, "settings");
        assert!(effects.is_empty());
        assert_eq!(state.active, Some(Section::Community));
        assert_eq!(surface.active_sections(), vec![Section::Community]);
    }

    #[test]
    fn unknown_name_before_any_show_leaves_none() {
        let mut state = ViewState::default();
        let mut surface = RecordingSurface::new();
        SectionRouter::show(&mut state, &mut surface, "nowhere");
        assert_eq!(state.active, None);
        assert!(surface.active_sections().is_empty());
    }

    #[test]
    fn missing_container_is_a_no_op() {
        let mut state = ViewState::default();
        let mut surface = RecordingSurface::new().without_section(Section::Analyze);
        SectionRouter::show(&mut state, &mut surface, "dashboard");
        SectionRouter::show(&mut state, &mut surface, "analyze");
        assert_eq!(state.active, Some(Section::Dashboard));
    }

    #[test]
    fn repeated_show_repeats_effects() {
        let mut state = ViewState::default();
        let mut surface = RecordingSurface::new();
        let first = SectionRouter::show(&mut state, &mut surface, "map");
        let second = SectionRouter::show(&mut state, &mut surface, "map");
        assert_eq!(first, &[SectionEffect::ScheduleMapInit]);
        assert_eq!(first, second);
        assert_eq!(surface.active_sections(), vec![Section::Map]);
    }
}
