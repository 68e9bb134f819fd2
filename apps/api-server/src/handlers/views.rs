//! Domain to DTO mapping.

use blogicum_core::domain::{Category, CommentRecord, Location, PostRecord, User};
use blogicum_core::listing::Page;
use blogicum_core::service::PostDetail;
use blogicum_shared::dto::{
    CategoryResponse, CommentResponse, LocationResponse, PageMeta, PostDetailResponse, PostPage,
    PostResponse, UserResponse,
};

pub fn user(user: User) -> UserResponse {
    UserResponse {
        id: user.id,
        username: user.username,
        first_name: user.first_name,
        last_name: user.last_name,
        created_at: user.created_at,
    }
}

pub fn category(category: Category) -> CategoryResponse {
    CategoryResponse {
        id: category.id,
        title: category.title,
        description: category.description,
        slug: category.slug,
        is_published: category.is_published,
    }
}

pub fn location(location: Location) -> LocationResponse {
    LocationResponse {
        id: location.id,
        name: location.name,
        is_published: location.is_published,
    }
}

pub fn post(record: PostRecord) -> PostResponse {
    let PostRecord {
        post,
        author_username,
        category: post_category,
        location: post_location,
        comment_count,
    } = record;

    PostResponse {
        id: post.id,
        title: post.title,
        text: post.text,
        pub_date: post.pub_date,
        author_id: post.author_id,
        author: author_username,
        category: post_category.map(category),
        location: post_location.map(location),
        is_published: post.is_published,
        comment_count,
        created_at: post.created_at,
    }
}

pub fn comment(record: CommentRecord) -> CommentResponse {
    CommentResponse {
        id: record.comment.id,
        post_id: record.comment.post_id,
        author_id: record.comment.author_id,
        author: record.author_username,
        text: record.comment.text,
        created_at: record.comment.created_at,
    }
}

pub fn post_page(page: Page<PostRecord>) -> PostPage {
    let page = page.map(post);
    let page_obj = PageMeta {
        number: page.number,
        num_pages: page.num_pages,
        total: page.total,
        per_page: page.per_page,
        has_next: page.has_next(),
        has_previous: page.has_previous(),
    };

    PostPage {
        posts: page.items,
        page_obj,
    }
}

pub fn post_detail(detail: PostDetail) -> PostDetailResponse {
    PostDetailResponse {
        post: post(detail.post),
        comments: detail.comments.into_iter().map(comment).collect(),
    }
}
