/// Screens reachable in the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Route {
    Search,
    SongLyrics,
}

/// Fire-and-forget navigation seam used by the search controller.
pub(crate) trait Navigator {
    fn navigate_to(&mut self, route: Route);
}

/// Navigation stack rooted at the search screen.
#[derive(Debug)]
pub(crate) struct Router {
    stack: Vec<Route>,
}

impl Default for Router {
    fn default() -> Self {
        Self {
            stack: vec![Route::Search],
        }
    }
}

impl Router {
    pub(crate) fn current(&self) -> Route {
        self.stack.last().copied().unwrap_or(Route::Search)
    }

    /// Pop the top route. The root is never popped; returns whether anything
    /// changed.
    pub(crate) fn back(&mut self) -> bool {
        if self.stack.len() > 1 {
            self.stack.pop();
            true
        } else {
            false
        }
    }
}

impl Navigator for Router {
    fn navigate_to(&mut self, route: Route) {
        self.stack.push(route);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_search_and_never_pops_root() {
        let mut router = Router::default();
        assert_eq!(router.current(), Route::Search);
        assert!(!router.back());
        assert_eq!(router.current(), Route::Search);
    }

    #[test]
    fn navigate_then_back() {
        let mut router = Router::default();
        router.navigate_to(Route::SongLyrics);
        assert_eq!(router.current(), Route::SongLyrics);
        assert!(router.back());
        assert_eq!(router.current(), Route::Search);
    }
}
