//! Book and category commands.

use bookstand_client::api::{BookSearch, BookUpdate, NewBook};
use bookstand_core::{BookId, CategoryId};
use clap::Subcommand;
use rust_decimal::Decimal;

use super::{CommandError, Context};
use crate::output;

#[derive(Subcommand)]
pub enum BooksAction {
    /// List the whole catalog
    List,
    /// Show one book
    Show { id: BookId },
    /// Search by keyword and/or category
    Search {
        #[arg(short, long)]
        query: Option<String>,

        #[arg(short, long)]
        category: Option<String>,
    },
    /// Catalog totals
    Count,
    /// Books running out of stock (raises a low-stock alert)
    LowStock,
    /// Add a book (admin)
    Add {
        #[arg(long)]
        title: String,

        #[arg(long)]
        author: String,

        #[arg(long)]
        price: Decimal,

        #[arg(long, default_value_t = 0)]
        stock: u32,

        #[arg(long)]
        isbn: Option<String>,

        #[arg(long)]
        category_id: Option<CategoryId>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        image: Option<String>,
    },
    /// Update fields of a book (admin)
    Update {
        id: BookId,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        author: Option<String>,

        #[arg(long)]
        price: Option<Decimal>,

        #[arg(long)]
        stock: Option<u32>,

        #[arg(long)]
        category_id: Option<CategoryId>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        image: Option<String>,

        /// Availability (e.g. `available`)
        #[arg(long)]
        status: Option<String>,
    },
    /// Delete a book (admin)
    Delete { id: BookId },
}

/// Run a books subcommand.
///
/// # Errors
///
/// Returns `CommandError` if the backend call fails.
pub async fn run(ctx: &Context, action: BooksAction) -> Result<(), CommandError> {
    let books = ctx.storefront.api().books();

    match action {
        BooksAction::List => output::emit(&books.all_books().await?)?,
        BooksAction::Show { id } => {
            let book = books
                .book_by_id(id)
                .await?
                .ok_or_else(|| CommandError::NotFound(format!("book {id}")))?;
            output::emit(&book)?;
        }
        BooksAction::Search { query, category } => {
            let found = books.search_books(&BookSearch { q: query, category }).await?;
            output::emit(&found)?;
        }
        BooksAction::Count => output::emit(&books.books_count().await?)?,
        BooksAction::LowStock => output::emit(&ctx.admin.check_low_stock().await?)?,
        BooksAction::Add {
            title,
            author,
            price,
            stock,
            isbn,
            category_id,
            description,
            image,
        } => {
            let book = NewBook {
                isbn,
                category_id,
                description,
                image,
                ..NewBook::new(title, author, price, stock)
            };
            match ctx.admin.add_book(&book).await? {
                Some(stored) => output::emit(&stored)?,
                None => output::line(format!("Added \"{}\"", book.title))?,
            }
        }
        BooksAction::Update {
            id,
            title,
            author,
            price,
            stock,
            category_id,
            description,
            image,
            status,
        } => {
            let update = BookUpdate {
                title,
                author,
                price,
                stock,
                category_id,
                description,
                image,
                status,
            };
            output::emit(&ctx.admin.api().books().update_book(id, &update).await?)?;
        }
        BooksAction::Delete { id } => {
            ctx.admin.delete_book(id).await?;
            output::line(format!("Deleted book {id}"))?;
        }
    }
    Ok(())
}

/// List categories.
///
/// # Errors
///
/// Returns `CommandError` if the backend call fails.
pub async fn categories(ctx: &Context) -> Result<(), CommandError> {
    output::emit(&ctx.storefront.api().books().all_categories().await?)?;
    Ok(())
}
