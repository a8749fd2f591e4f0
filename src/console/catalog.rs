use crate::audit::AuditTrail;
use crate::cart::money;
use crate::checkout::CheckoutStore;
use crate::ids::{IdAllocator, IdKind};
use crate::model::{CatalogEntry, CatalogFilter, NewCatalogEntry, PriceOrder, Role};
use crate::repository::{CatalogRepository, CatalogText};
use crate::validate::{
    bounded_text, is_valid_game_id, parse_price, MAX_GAME_NAME_LEN, MAX_GENRE_LEN,
};
use crate::{RentalResult, UnitOfWork, UnitOfWorkSession};

use super::prompt::{ask, ask_twice, ask_valid, banner, confirm, read_choice};
use super::{Shell, Terminal};

fn describe_filter(filter: &CatalogFilter) -> String {
    match (&filter.genre, filter.max_price) {
        (Some(genre), Some(max)) => format!(
            "Displaying results for: Genre = \"{genre}\", Price < {}",
            money(max)
        ),
        (Some(genre), None) => format!("Displaying results for: Genre = \"{genre}\""),
        (None, Some(max)) => format!("Displaying results for: Price < {}", money(max)),
        (None, None) => "Displaying full catalog".to_string(),
    }
}

fn catalog_row(entry: &CatalogEntry) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}",
        entry.game_id,
        entry.name,
        entry.genre,
        money(entry.price),
        entry.description
    )
}

impl<T: Terminal> Shell<T> {
    /// Catalog browser with genre, price and sort settings kept between views.
    pub(super) async fn browse_catalog(&mut self) -> RentalResult<()> {
        let mut filter = CatalogFilter::default();
        loop {
            banner(&mut self.term, "Game Catalog")?;
            self.menu(
                "CATALOG SETTINGS",
                &[
                    "1. View Catalog",
                    "2. Set Genre",
                    "3. Set Price Range",
                    "4. Reset Genre",
                    "5. Reset Price",
                    "6. Change Sort",
                    "9. Return to Main Menu",
                ],
            )?;
            match read_choice(&mut self.term)? {
                1 => {
                    let result = self.show_catalog(&filter).await;
                    self.report(result)?;
                }
                2 => {
                    self.term.write_line("Only 1 genre can be viewed at a time.")?;
                    let genre = ask(&mut self.term, "Please enter genre: ")?;
                    filter.genre = (!genre.is_empty()).then_some(genre);
                }
                3 => {
                    let max = ask_valid(
                        &mut self.term,
                        "Please enter maximum price: ",
                        "Invalid price",
                        parse_price,
                    )?;
                    filter.max_price = Some(max);
                }
                4 => {
                    filter.genre = None;
                    self.term.write_line("Genre set to default.")?;
                }
                5 => {
                    filter.max_price = None;
                    self.term.write_line("Price set to default.")?;
                }
                6 => {
                    filter.order = filter.order.toggled();
                    self.term.write_line(match filter.order {
                        PriceOrder::Ascending => "Sorting by: Price Ascending",
                        PriceOrder::Descending => "Sorting by: Price Descending",
                    })?;
                }
                9 => return Ok(()),
                _ => self.term.write_line("Unrecognized choice!")?,
            }
        }
    }

    async fn show_catalog(&mut self, filter: &CatalogFilter) -> RentalResult<()> {
        let session = self.uow.begin().await?;
        let entries = CatalogRepository::new(session.executor().clone())
            .list(filter)
            .await?;
        session.commit().await?;

        if !entries.is_empty() {
            self.term.write_line("gameID\tname\tgenre\tprice\tdescription")?;
        }
        for entry in &entries {
            self.term.write_line(&catalog_row(entry))?;
        }
        self.term
            .write_line(&format!("total row(s): {}", entries.len()))?;
        self.term.write_line(&describe_filter(filter))
    }

    pub(super) async fn update_catalog(&mut self, login: &str) -> RentalResult<()> {
        self.term.write_line("You have selected: Update Catalog")?;
        self.require(login, Role::can_manage_store, "update the catalog")
            .await?;

        loop {
            banner(&mut self.term, "Update Game Catalog")?;
            self.menu(
                "CATALOG OPTIONS",
                &[
                    "1. Change Game Name",
                    "2. Change Genre",
                    "3. Change Price",
                    "4. Change Description",
                    "5. Change Image",
                    "6. Add New Game",
                    "7. Remove Game",
                    "9. Return to Main Menu",
                ],
            )?;
            let result = match read_choice(&mut self.term)? {
                1 => self.change_catalog_text(CatalogText::Name).await,
                2 => self.change_catalog_text(CatalogText::Genre).await,
                3 => self.change_price().await,
                4 => self.change_catalog_text(CatalogText::Description).await,
                5 => self.change_catalog_text(CatalogText::ImageUrl).await,
                6 => self.add_game().await,
                7 => self.remove_game().await,
                9 => return Ok(()),
                _ => self.term.write_line("Unrecognized choice!"),
            };
            self.report(result)?;
        }
    }

    /// Asks for a catalog game ID until it names an existing game.
    async fn ask_existing_game(&mut self) -> RentalResult<String> {
        loop {
            let game_id = ask(&mut self.term, "Please enter gameID (game0000): ")?;
            if is_valid_game_id(&game_id) && self.checkout.game_exists(&game_id).await? {
                return Ok(game_id);
            }
            self.term.write_line("Invalid gameID")?;
        }
    }

    async fn change_catalog_text(&mut self, field: CatalogText) -> RentalResult<()> {
        let label = field.label();
        self.term
            .write_line(&format!("You have selected: Change {label}"))?;
        let game_id = self.ask_existing_game().await?;
        let max_len = field.max_len().unwrap_or(usize::MAX);
        let value = ask_twice(
            &mut self.term,
            &format!("Please enter new {label}: "),
            &format!("Please confirm new {label}: "),
            "Invalid input",
            |s| bounded_text(s, max_len),
        )?;
        let Some(value) = value else {
            return self.term.write_line("Returning to Catalog Settings...");
        };

        let session = self.uow.begin().await?;
        let audit = AuditTrail::new();
        session.register_transaction_aware(audit.clone());
        CatalogRepository::new(session.executor().clone())
            .update_text(&game_id, field, &value)
            .await?;
        audit.record(format!("{label} of {game_id} changed to '{value}'"));
        session.commit().await?;

        self.term
            .write_line(&format!("Changed {label} of {game_id} to {value}"))
    }

    async fn change_price(&mut self) -> RentalResult<()> {
        self.term.write_line("You have selected: Change Price")?;
        let game_id = self.ask_existing_game().await?;
        let price = ask_twice(
            &mut self.term,
            "Please enter new price: ",
            "Please confirm new price: ",
            "Invalid price",
            parse_price,
        )?;
        let Some(price) = price else {
            return self.term.write_line("Returning to Catalog Settings...");
        };

        let session = self.uow.begin().await?;
        let audit = AuditTrail::new();
        session.register_transaction_aware(audit.clone());
        CatalogRepository::new(session.executor().clone())
            .update_price(&game_id, price)
            .await?;
        audit.record(format!("price of {game_id} changed to {}", money(price)));
        session.commit().await?;

        self.term.write_line(&format!(
            "Changed price of {game_id} to ${}",
            money(price)
        ))
    }

    async fn add_game(&mut self) -> RentalResult<()> {
        self.term.write_line("You have selected: Add New Game")?;
        let name = ask_valid(
            &mut self.term,
            &format!("Please enter game name (up to {MAX_GAME_NAME_LEN} characters): "),
            "Invalid input",
            |s| bounded_text(s, MAX_GAME_NAME_LEN),
        )?;
        let genre = ask_valid(
            &mut self.term,
            &format!("Please enter genre (up to {MAX_GENRE_LEN} characters): "),
            "Invalid input",
            |s| bounded_text(s, MAX_GENRE_LEN),
        )?;
        let price = ask_valid(
            &mut self.term,
            "Please enter price: ",
            "Invalid price",
            parse_price,
        )?;
        let description = ask(&mut self.term, "Please enter description: ")?;
        let image_url = ask(&mut self.term, "Please enter image URL: ")?;
        let new_entry = NewCatalogEntry {
            name,
            genre,
            price,
            description,
            image_url,
        };

        let session = self.uow.begin().await?;
        let audit = AuditTrail::new();
        session.register_transaction_aware(audit.clone());
        let game_id = IdAllocator::allocate(session.executor(), IdKind::Game).await?;
        let entry = new_entry.with_id(game_id);
        CatalogRepository::new(session.executor().clone())
            .create(&entry)
            .await?;
        audit.record(format!("game {} added: {}", entry.game_id, entry.name));
        session.commit().await?;

        self.term
            .write_line(&format!("Added {} as {}", entry.name, entry.game_id))
    }

    async fn remove_game(&mut self) -> RentalResult<()> {
        self.term.write_line("You have selected: Remove Game")?;
        let game_id = self.ask_existing_game().await?;

        let session = self.uow.begin().await?;
        let references = CatalogRepository::new(session.executor().clone())
            .count_order_lines(&game_id)
            .await?;
        session.commit().await?;
        if references > 0 {
            return self.term.write_line(&format!(
                "{game_id} appears in {references} rental order line(s) and cannot be removed"
            ));
        }
        if !confirm(&mut self.term, &format!("Remove {game_id} from the catalog? (y/n): "))? {
            return self.term.write_line("Returning to Catalog Settings...");
        }

        let session = self.uow.begin().await?;
        let audit = AuditTrail::new();
        session.register_transaction_aware(audit.clone());
        CatalogRepository::new(session.executor().clone())
            .delete(&game_id)
            .await?;
        audit.record(format!("game {game_id} removed"));
        session.commit().await?;

        self.term.write_line(&format!("Removed {game_id}"))
    }
}
