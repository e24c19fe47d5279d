use std::fmt;

use crate::menu::model::UserInfo;
use crate::skin::error::SkinError;

/// The four page notifications, in the only order they may occur
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SkinPhase {
    Init,
    Load,
    PreRender,
    Unload,
}

impl SkinPhase {
    pub const ALL: [SkinPhase; 4] = [SkinPhase::Init, SkinPhase::Load, SkinPhase::PreRender, SkinPhase::Unload];

    pub fn next(self) -> Option<SkinPhase> {
        match self {
            SkinPhase::Init => Some(SkinPhase::Load),
            SkinPhase::Load => Some(SkinPhase::PreRender),
            SkinPhase::PreRender => Some(SkinPhase::Unload),
            SkinPhase::Unload => None,
        }
    }
}

impl fmt::Display for SkinPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SkinPhase::Init => "init",
            SkinPhase::Load => "load",
            SkinPhase::PreRender => "pre_render",
            SkinPhase::Unload => "unload",
        };
        f.write_str(name)
    }
}

/// The page being rendered and who it is rendered for
#[derive(Debug, Clone, PartialEq)]
pub struct SkinEventArgs {
    pub page_id: i32,
    pub portal_id: i32,
    pub user: UserInfo,
}

impl SkinEventArgs {
    pub fn new(page_id: i32, user: UserInfo) -> Self {
        Self {
            page_id,
            portal_id: user.portal_id,
            user,
        }
    }
}

/// Tracks one page render; each phase must come exactly once, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLifecycle {
    page_id: i32,
    last: Option<SkinPhase>,
}

impl PageLifecycle {
    pub fn new(page_id: i32) -> Self {
        Self { page_id, last: None }
    }

    pub fn page_id(&self) -> i32 {
        self.page_id
    }

    pub fn current(&self) -> Option<SkinPhase> {
        self.last
    }

    pub fn expected(&self) -> Option<SkinPhase> {
        match self.last {
            None => Some(SkinPhase::Init),
            Some(phase) => phase.next(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.last == Some(SkinPhase::Unload)
    }

    pub fn advance(&mut self, phase: SkinPhase) -> Result<(), SkinError> {
        match self.expected() {
            Some(expected) if expected == phase => {
                self.last = Some(phase);
                Ok(())
            }
            Some(expected) => Err(SkinError::OutOfOrder {
                page_id: self.page_id,
                expected: expected.to_string(),
                got: phase.to_string(),
            }),
            None => Err(SkinError::AlreadyCompleted {
                page_id: self.page_id,
                got: phase.to_string(),
            }),
        }
    }
}
