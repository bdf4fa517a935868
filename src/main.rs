use anyhow::Result;
use catalog::{
    AddOns, BALLOON_SURCHARGE, CHOCOLATE_SURCHARGE, Catalog, SizeVariant, TEDDY_SURCHARGE,
};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use storefront::{CartError, CartStore, Config, FileSlot, Totals};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(author, version, about = "Petal: a flower shop storefront")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Browse the bouquet catalog
    Shop,
    /// Show the cart and its totals
    Cart,
    /// Add a bouquet to the cart
    Add {
        /// Product id, e.g. "tulips"
        product: String,

        /// Bouquet size in stems: 1, 6, 12 or 24
        #[arg(long, default_value_t = 1)]
        size: u32,

        /// Gift note, at most 100 characters
        #[arg(long, default_value = "")]
        note: String,

        /// Attach a balloon
        #[arg(long)]
        balloon: bool,

        /// Attach a box of chocolate
        #[arg(long)]
        chocolate: bool,

        /// Attach a teddy bear
        #[arg(long)]
        teddy: bool,

        #[arg(long, default_value_t = 1)]
        qty: u32,
    },
    /// Increase a line's quantity by one
    Plus { line: u64 },
    /// Decrease a line's quantity by one
    Minus { line: u64 },
    /// Delete a line from the cart
    Remove { line: u64 },
    /// Empty the cart
    Clear,
    /// Check out and empty the cart
    Checkout,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let args = Args::parse();
    let config = Config::load();

    let mut store = CartStore::open(
        Catalog::standard(),
        Box::new(FileSlot::new(config.cart_path)),
    );

    match args.command {
        Command::Shop => print_catalog(store.catalog()),
        Command::Cart => print_cart(&store),
        Command::Add {
            product,
            size,
            note,
            balloon,
            chocolate,
            teddy,
            qty,
        } => {
            let size = SizeVariant::try_from(size)?;
            let add_ons = AddOns {
                balloon,
                chocolate,
                teddy,
            };
            let item = store.add_item(&product, size, &note, add_ons, qty)?;
            let name = store
                .catalog()
                .get(&item.product_id)
                .map_or(item.product_id.as_str(), |p| p.name);
            println!("{name} added to cart.");
            print_cart(&store);
        }
        Command::Plus { line } => {
            store.change_quantity(line, 1)?;
            print_cart(&store);
        }
        Command::Minus { line } => {
            store.change_quantity(line, -1)?;
            print_cart(&store);
        }
        Command::Remove { line } => {
            store.remove_item(line)?;
            print_cart(&store);
        }
        Command::Clear => {
            store.clear()?;
            print_cart(&store);
        }
        Command::Checkout => match store.checkout() {
            Ok(totals) => {
                println!(
                    "Thank you for your order, you will get an email confirmation \
                     when your order is ready for pick-up."
                );
                print_totals(&totals);
            }
            Err(CartError::EmptyCart) => println!("Your cart is empty."),
            Err(e) => return Err(e.into()),
        },
    }

    Ok(())
}

fn print_catalog(catalog: &Catalog) {
    println!("Petal: bouquets\n");
    for product in catalog.products() {
        println!(
            "{} ({})  from {}",
            product.name,
            product.id,
            format_price(product.prices.starting_at())
        );
        let sizes = SizeVariant::ALL
            .iter()
            .map(|&size| format!("{} {}", size.label(), format_price(product.prices.price(size))))
            .collect::<Vec<_>>()
            .join(" | ");
        println!("    {sizes}");
    }
    println!(
        "\nAdd-ons: balloon +{} | chocolate +{} | teddy +{}",
        format_price(BALLOON_SURCHARGE),
        format_price(CHOCOLATE_SURCHARGE),
        format_price(TEDDY_SURCHARGE)
    );
}

fn print_cart(store: &CartStore) {
    if store.is_empty() {
        println!("\nYour cart is empty.");
        return;
    }

    println!("\nCart ({} items)", store.total_quantity());
    for item in store.items() {
        let name = store
            .catalog()
            .get(&item.product_id)
            .map_or(item.product_id.as_str(), |p| p.name);
        println!(
            "#{} {} ({}) x{}  {}  ({} ea)",
            item.line_id,
            name,
            item.size.label(),
            item.quantity,
            format_price(item.line_total()),
            format_price(item.unit_price)
        );
        let extras = item.add_ons.labels();
        if !extras.is_empty() {
            println!("    extras: {}", extras.join(", "));
        }
        if !item.note.is_empty() {
            println!("    note: {}", item.note);
        }
    }
    print_totals(&store.totals());
}

fn print_totals(totals: &Totals) {
    println!("Subtotal {}", format_price(totals.subtotal));
    println!("Tax      {}", format_price(totals.tax));
    println!("Total    {}", format_price(totals.grand));
}

fn format_price(value: Decimal) -> String {
    format!("${value:.2}")
}
