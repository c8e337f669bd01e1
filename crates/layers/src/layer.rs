/// Map-widget identifier shared by a rendering layer and its backing source.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(pub &'static str);

impl LayerId {
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for LayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

pub trait Layer {
    fn id(&self) -> LayerId;
}
