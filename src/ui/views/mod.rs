mod article_detail;
mod article_list;
mod create_article;

pub use article_detail::ArticleDetailView;
pub use article_list::ArticleListView;
pub use create_article::CreateArticleView;
