use crate::domain::post::{Post, PostSource};

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Accumulates pages from a [`PostSource`] and filters them client-side.
///
/// Page 1 replaces whatever was loaded; later pages append. A failed fetch
/// records an error message and leaves loaded posts untouched.
pub struct PostFeed<P: PostSource> {
    source: P,
    page_size: u32,
    page: u32,
    posts: Vec<Post>,
    search: String,
    error: Option<String>,
    loading: bool,
    loaded: bool,
}

impl<P: PostSource> PostFeed<P> {
    pub fn new(source: P, page_size: u32) -> Self {
        Self { source, page_size: page_size.max(1), page: 1, posts: Vec::new(), search: String::new(), error: None, loading: false, loaded: false }
    }

    pub fn page(&self) -> u32 { self.page }

    pub fn posts(&self) -> &[Post] { &self.posts }

    pub fn error(&self) -> Option<&str> { self.error.as_deref() }

    pub fn is_loading(&self) -> bool { self.loading }

    /// True once any page load has finished, even an empty or failed one.
    pub fn has_loaded(&self) -> bool { self.loaded }

    pub fn search_term(&self) -> &str { &self.search }

    pub async fn load_page(&mut self, page: u32) {
        let page = page.max(1);
        self.page = page;
        self.loading = true;
        self.error = None;
        match self.source.fetch_page(page, self.page_size).await {
            Ok(raw) => {
                let fetched = raw.into_iter().map(Post::from);
                if page == 1 {
                    self.posts = fetched.collect();
                } else {
                    self.posts.extend(fetched);
                }
                tracing::debug!(page, total = self.posts.len(), "posts page loaded");
            }
            Err(err) => {
                tracing::warn!(page, error = %err, "posts page failed");
                self.error = Some(err.to_string());
            }
        }
        self.loading = false;
        self.loaded = true;
    }

    pub async fn load_more(&mut self) { self.load_page(self.page + 1).await }

    pub async fn retry(&mut self) { self.load_page(self.page).await }

    pub fn search(&mut self, term: impl Into<String>) { self.search = term.into(); }

    /// Loaded posts matching the search term, in load order.
    pub fn filtered(&self) -> impl Iterator<Item = &Post> + Clone + '_ {
        let term = self.search.as_str();
        self.posts.iter().filter(move |post| post.matches(term))
    }

    pub async fn reset(&mut self) {
        self.search.clear();
        self.posts.clear();
        self.load_page(1).await;
    }
}
