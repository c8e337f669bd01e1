use std::fmt;

/// Top-level page section. Exactly one is active once the page has started.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Section {
    Dashboard,
    Map,
    Analyze,
    Routes,
    Community,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Dashboard,
        Section::Map,
        Section::Analyze,
        Section::Routes,
        Section::Community,
    ];

    /// Parses a `data-section` attribute value.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == name.trim())
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Section::Dashboard => "dashboard",
            Section::Map => "map",
            Section::Analyze => "analyze",
            Section::Routes => "routes",
            Section::Community => "community",
        }
    }

    /// Id of the section container, `{name}-section`.
    pub fn container_id(self) -> &'static str {
        match self {
            Section::Dashboard => "dashboard-section",
            Section::Map => "map-section",
            Section::Analyze => "analyze-section",
            Section::Routes => "routes-section",
            Section::Community => "community-section",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Work triggered by entering a section.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SectionEffect {
    /// Initialise the map after the container has been laid out.
    ScheduleMapInit,
    RefreshDashboard,
    RefreshCommunity,
    RefreshLeaderboard,
}

/// Dispatch table from section to the effects of entering it.
pub fn effects_for(section: Section) -> &'static [SectionEffect] {
    match section {
        Section::Map => &[SectionEffect::ScheduleMapInit],
        Section::Dashboard => &[SectionEffect::RefreshDashboard],
        Section::Community => &[
            SectionEffect::RefreshCommunity,
            SectionEffect::RefreshLeaderboard,
        ],
        Section::Analyze | Section::Routes => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for s in Section::ALL {
            assert_eq!(Section::parse(s.as_str()), Some(s));
            assert_eq!(s.container_id(), format!("{s}-section"));
        }
    }

    #[test]
    fn unknown_name() {
        assert_eq!(Section::parse("settings"), None);
        assert_eq!(Section::parse(""), None);
    }

    #[test]
    fn community_refreshes_feed_and_leaderboard() {
        assert_eq!(
            effects_for(Section::Community),
            &[
                SectionEffect::RefreshCommunity,
                SectionEffect::RefreshLeaderboard
            ]
        );
        assert!(effects_for(Section::Routes).is_empty());
    }
}
