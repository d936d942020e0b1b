//! Fixed site routes.

use crate::sitemap::ChangeFreq;

/// Hand-written pages that exist regardless of content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StaticPage {
    Home,
    Projects,
    Blog,
    About,
    Contact,
}

impl StaticPage {
    /// Every static page, in navigation order.
    pub const ALL: [StaticPage; 5] = [
        Self::Home,
        Self::Projects,
        Self::Blog,
        Self::About,
        Self::Contact,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Projects => "/projects",
            Self::Blog => "/blog",
            Self::About => "/about",
            Self::Contact => "/contact",
        }
    }

    /// Page title; the home page uses the bare site name.
    pub fn title(&self) -> Option<&'static str> {
        match self {
            Self::Home => None,
            Self::Projects => Some("Projects"),
            Self::Blog => Some("Blog"),
            Self::About => Some("About"),
            Self::Contact => Some("Contact"),
        }
    }

    /// Page description; the home page uses the site description.
    pub fn description(&self) -> Option<&'static str> {
        match self {
            Self::Home => None,
            Self::Projects => Some("A showcase of my recent work and case studies"),
            Self::Blog => {
                Some("Articles and insights on web development, performance, and best practices")
            }
            Self::About => {
                Some("Learn more about my journey, experience, and passion for web development")
            }
            Self::Contact => Some("Get in touch to discuss your project or just say hello"),
        }
    }

    pub fn change_frequency(&self) -> ChangeFreq {
        match self {
            Self::Projects | Self::Blog => ChangeFreq::Weekly,
            Self::Home | Self::About | Self::Contact => ChangeFreq::Monthly,
        }
    }

    pub fn priority(&self) -> f32 {
        match self {
            Self::Home => 1.0,
            Self::Projects | Self::Blog => 0.9,
            Self::About => 0.8,
            Self::Contact => 0.7,
        }
    }

    /// Directory name under the output root, `None` for the home page.
    pub fn slug(&self) -> Option<&'static str> {
        self.path().strip_prefix('/').filter(|s| !s.is_empty())
    }
}
