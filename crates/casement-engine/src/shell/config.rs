use std::fmt;
use std::str::FromStr;

use crate::coords::ColorRgba;
use crate::input::Key;

use super::ShellError;

/// Requested graphics API version (`major.minor`).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ApiVersion {
    pub major: u8,
    pub minor: u8,
}

impl ApiVersion {
    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }

    /// True for versions that were actually released (1.0-1.5, 2.0-2.1, 3.0-3.3, 4.0-4.6).
    pub fn is_published(self) -> bool {
        match self.major {
            1 => self.minor <= 5,
            2 => self.minor <= 1,
            3 => self.minor <= 3,
            4 => self.minor <= 6,
            _ => false,
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for ApiVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (major, minor) = s
            .trim()
            .split_once('.')
            .ok_or_else(|| format!("expected MAJOR.MINOR, got `{s}`"))?;
        let major = major.parse().map_err(|_| format!("bad major version `{major}`"))?;
        let minor = minor.parse().map_err(|_| format!("bad minor version `{minor}`"))?;
        Ok(Self::new(major, minor))
    }
}

/// Context profile.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum Profile {
    /// No specific profile; the only valid choice below 3.2.
    Any,
    #[default]
    Core,
    Compatibility,
}

impl FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "any" => Ok(Profile::Any),
            "core" => Ok(Profile::Core),
            "compat" | "compatibility" => Ok(Profile::Compatibility),
            other => Err(format!("unknown profile `{other}` (expected any, core or compat)")),
        }
    }
}

/// What the window's graphics context must provide.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct GraphicsHints {
    pub version: ApiVersion,
    pub profile: Profile,
    pub forward_compatible: bool,
}

impl Default for GraphicsHints {
    fn default() -> Self {
        Self {
            version: ApiVersion::new(3, 3),
            profile: Profile::Core,
            forward_compatible: true,
        }
    }
}

impl GraphicsHints {
    /// Rejects hint combinations no context can satisfy.
    ///
    /// Profiles only exist from 3.2 on; forward compatibility from 3.0 on.
    pub fn validate(&self) -> Result<(), ShellError> {
        if !self.version.is_published() {
            return Err(ShellError::WindowCreation(format!(
                "unknown graphics API version {}",
                self.version
            )));
        }
        if self.profile != Profile::Any && self.version < ApiVersion::new(3, 2) {
            return Err(ShellError::WindowCreation(format!(
                "{:?} profile requested for version {}, profiles start at 3.2",
                self.profile, self.version
            )));
        }
        if self.forward_compatible && self.version < ApiVersion::new(3, 0) {
            return Err(ShellError::WindowCreation(format!(
                "forward-compatible context requested for version {}, needs 3.0 or later",
                self.version
            )));
        }
        Ok(())
    }
}

/// Window attributes fixed at creation.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct WindowConfig {
    /// Framebuffer width in pixels.
    pub width: u32,
    /// Framebuffer height in pixels.
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "Learn OpenGL :: Window".to_string(),
        }
    }
}

impl WindowConfig {
    pub fn validate(&self) -> Result<(), ShellError> {
        if self.width == 0 || self.height == 0 {
            return Err(ShellError::InvalidConfig(format!(
                "window size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

/// Everything the shell needs to bring a window up and drive it.
#[derive(Debug, Clone)]
pub struct ShellConfig {
    pub window: WindowConfig,
    pub hints: GraphicsHints,

    /// Color the buffer is cleared to at the start of every frame.
    pub clear_color: ColorRgba,

    /// Key that closes the window while held.
    pub exit_key: Key,

    /// Wait for vertical blank on present.
    pub vsync: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            hints: GraphicsHints::default(),
            clear_color: ColorRgba::teal(),
            exit_key: Key::Escape,
            vsync: true,
        }
    }
}

impl ShellConfig {
    pub fn new(width: u32, height: u32, title: impl Into<String>) -> Self {
        Self {
            window: WindowConfig {
                width,
                height,
                title: title.into(),
            },
            ..Self::default()
        }
    }

    pub fn with_hints(mut self, hints: GraphicsHints) -> Self {
        self.hints = hints;
        self
    }

    pub fn with_clear_color(mut self, color: ColorRgba) -> Self {
        self.clear_color = color;
        self
    }

    pub fn with_exit_key(mut self, key: Key) -> Self {
        self.exit_key = key;
        self
    }

    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    pub fn validate(&self) -> Result<(), ShellError> {
        self.window.validate()?;
        if !self.clear_color.is_finite() {
            return Err(ShellError::InvalidConfig("clear color must be finite".into()));
        }
        self.hints.validate()
    }
}
