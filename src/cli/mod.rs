use clap::{Parser, Subcommand};
use humanize_bytes::humanize_bytes_decimal;
use itertools::Itertools;
use uuid::Uuid;
use crate::categorize;
use crate::client::{sort_media, MediaFilter, MediaStore, SortMode};
use crate::config::AppConfig;
use crate::entities::{Media, MediaDraft, MediaPatch, TrashEntry};
use crate::storage::FileStorage;

#[derive(Parser, Debug)]
#[command(name = "mediakeep", about = "A personal bookmarking gallery for embeddable media snippets.")]
pub struct Cli {
    #[arg(long, env = "MEDIAKEEP_WORKDIR", global = true, help = "Data directory, defaults to ~/.mediakeep")]
    pub workdir: Option<String>,

    #[arg(short, long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Bookmark a new embed snippet
    Add {
        title: String,
        embed: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, help = "Detected from the snippet when omitted")]
        category: Option<String>,
        #[arg(long, help = "Suggested from the title when omitted")]
        tags: Option<String>,
    },
    /// List items, optionally filtered and sorted
    List {
        #[arg(default_value = "all", help = "all, favorites, pinned, popular or a category name")]
        filter: String,
        #[arg(long, help = "pinned, newest, oldest, alphabetical, alphabetical-reverse, most-viewed")]
        sort: Option<String>,
    },
    /// Full-text search over title, category, tags and description
    Search { query: String },
    /// Show one item in full
    Show { id: Uuid },
    /// Record a view of an item
    View { id: Uuid },
    /// Toggle the favorite flag
    Favorite { id: Uuid },
    /// Toggle the pinned flag
    Pin { id: Uuid },
    /// Update fields of an existing item
    Update {
        id: Uuid,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        tags: Option<String>,
        #[arg(long)]
        embed: Option<String>,
    },
    /// Save a copy of an item
    Duplicate { id: Uuid },
    /// Move an item to trash
    Delete { id: Uuid },
    /// Trash maintenance
    #[command(subcommand)]
    Trash(TrashCommand),
    /// Named collections of items
    #[command(subcommand)]
    Collection(CollectionCommand),
    /// Groups of items sharing the same title
    Duplicates,
    /// Similar items for a given item
    Recommend { id: Uuid },
    /// Library statistics
    Stats,
}

#[derive(Subcommand, Debug)]
pub enum TrashCommand {
    /// List trashed items
    List,
    /// Move an item back to the active set
    Restore { id: Uuid },
    /// Delete an item from trash for good
    Delete { id: Uuid },
    /// Drop entries past the 30-day retention window
    Purge,
    /// Delete everything in trash
    Empty,
}

#[derive(Subcommand, Debug)]
pub enum CollectionCommand {
    Create {
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    List,
    Show { id: Uuid },
    /// Add a media item to a collection
    Add { collection: Uuid, media: Uuid },
    /// Remove a media item from a collection
    Remove { collection: Uuid, media: Uuid },
    Delete { id: Uuid },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::new(cli.workdir.as_deref())?;
    let storage = FileStorage::new(config.workdir)?;
    let mut store = MediaStore::new(storage);

    match cli.command {
        Command::Add { title, embed, description, category, tags } => {
            let category = category.unwrap_or_else(|| categorize::detect_category(&embed).to_string());
            let tags = tags.unwrap_or_else(|| categorize::suggest_tags(&title));
            let draft = MediaDraft { title, description, category, tags, embed };
            let media = store.save_media(draft)?;
            println!("Saved: {}", media.id);
        }
        Command::List { filter, sort } => {
            let mut items = store.filter_media(&MediaFilter::parse(&filter));
            if let Some(sort) = sort {
                let mode = sort.parse::<SortMode>().map_err(anyhow::Error::msg)?;
                items = sort_media(&items, mode);
            }
            print_media_list(&items);
        }
        Command::Search { query } => {
            print_media_list(&store.search_media(&query));
        }
        Command::Show { id } => {
            let media = store.media_by_id(id)
                .ok_or_else(|| anyhow::anyhow!("media not found: {}", id))?;
            print_media_full(&media);
        }
        Command::View { id } => {
            if !store.increment_view(id)? {
                anyhow::bail!("media not found: {}", id);
            }
            println!("Recorded view: {}", id);
        }
        Command::Favorite { id } => {
            let flag = store.toggle_favorite(id)?
                .ok_or_else(|| anyhow::anyhow!("media not found: {}", id))?;
            println!("favorite: {}", flag);
        }
        Command::Pin { id } => {
            let flag = store.toggle_pin(id)?
                .ok_or_else(|| anyhow::anyhow!("media not found: {}", id))?;
            println!("pinned: {}", flag);
        }
        Command::Update { id, title, description, category, tags, embed } => {
            let patch = MediaPatch { title, description, category, tags, embed };
            if !store.update_media(id, patch)? {
                anyhow::bail!("media not found: {}", id);
            }
            println!("Updated: {}", id);
        }
        Command::Duplicate { id } => {
            let copy = store.duplicate_media(id)?
                .ok_or_else(|| anyhow::anyhow!("media not found: {}", id))?;
            println!("Saved copy: {}", copy.id);
        }
        Command::Delete { id } => {
            if !store.delete_media(id)? {
                anyhow::bail!("media not found: {}", id);
            }
            println!("Moved to trash: {}", id);
        }
        Command::Trash(command) => run_trash(&mut store, command)?,
        Command::Collection(command) => run_collection(&mut store, command)?,
        Command::Duplicates => {
            let groups = store.find_duplicates();
            if groups.is_empty() {
                println!("No duplicate titles found");
            }
            for group in groups {
                println!("{}", group.iter().map(|x| x.to_string()).join(" "));
            }
        }
        Command::Recommend { id } => {
            print_media_list(&store.recommendations(id));
        }
        Command::Stats => {
            let stats = store.statistics();
            println!("Items:         {}", stats.total_items);
            println!("Favorites:     {}", stats.total_favorites);
            println!("Total views:   {}", stats.total_views);
            println!("Top category:  {}", stats.most_used_category.as_deref().unwrap_or("none"));
            println!("Storage size:  {}", humanize_bytes_decimal!(stats.storage_size));
            for (category, count) in stats.categories.iter().sorted() {
                println!("  {}: {}", category, count);
            }
        }
    }
    Ok(())
}

fn run_trash(store: &mut MediaStore<FileStorage>, command: TrashCommand) -> anyhow::Result<()> {
    match command {
        TrashCommand::List => {
            for entry in store.trash() {
                print_trash_entry(&entry);
            }
        }
        TrashCommand::Restore { id } => {
            if !store.restore_media(id)? {
                anyhow::bail!("trash entry not found: {}", id);
            }
            println!("Restored: {}", id);
        }
        TrashCommand::Delete { id } => {
            if !store.permanent_delete(id)? {
                anyhow::bail!("trash entry not found: {}", id);
            }
            println!("Deleted permanently: {}", id);
        }
        TrashCommand::Purge => {
            let purged = store.purge_expired()?;
            println!("Purged {} expired entries", purged);
        }
        TrashCommand::Empty => {
            store.empty_trash()?;
            println!("Trash emptied");
        }
    }
    Ok(())
}

fn run_collection(store: &mut MediaStore<FileStorage>, command: CollectionCommand) -> anyhow::Result<()> {
    match command {
        CollectionCommand::Create { name, description } => {
            let collection = store.create_collection(name, description)?;
            println!("Created collection: {}", collection.id);
        }
        CollectionCommand::List => {
            for collection in store.all_collections() {
                println!("{}  {} ({} items)", collection.id, collection.name, collection.items.len());
            }
        }
        CollectionCommand::Show { id } => {
            let collection = store.collection_by_id(id)
                .ok_or_else(|| anyhow::anyhow!("collection not found: {}", id))?;
            println!("{}  {}", collection.id, collection.name);
            if !collection.description.is_empty() {
                println!("{}", collection.description);
            }
            for media_id in &collection.items {
                match store.media_by_id(*media_id) {
                    Some(media) => println!("  {}  {}", media.id, media.title),
                    None => println!("  {}  (missing)", media_id),
                }
            }
        }
        CollectionCommand::Add { collection, media } => {
            if !store.add_to_collection(collection, media)? {
                anyhow::bail!("collection not found or item already a member");
            }
            println!("Added {} to {}", media, collection);
        }
        CollectionCommand::Remove { collection, media } => {
            if !store.remove_from_collection(collection, media)? {
                anyhow::bail!("collection not found: {}", collection);
            }
            println!("Removed {} from {}", media, collection);
        }
        CollectionCommand::Delete { id } => {
            if !store.delete_collection(id)? {
                anyhow::bail!("collection not found: {}", id);
            }
            println!("Deleted collection: {}", id);
        }
    }
    Ok(())
}

fn print_media_list(items: &[Media]) {
    for media in items {
        let mut flags = String::new();
        if media.favorite {
            flags.push('*');
        }
        if media.pinned {
            flags.push('^');
        }
        println!(
            "{}  {:40}  [{}]  views={}  {}",
            media.id, media.title, media.category, media.view_count, flags
        );
    }
}

fn print_media_full(media: &Media) {
    println!("id:          {}", media.id);
    println!("title:       {}", media.title);
    println!("category:    {}", media.category);
    println!("tags:        {}", media.tags);
    println!("description: {}", media.description);
    println!("favorite:    {}", media.favorite);
    println!("pinned:      {}", media.pinned);
    println!("views:       {}", media.view_count);
    println!("created:     {}", media.created_at);
    if let Some(updated_at) = media.updated_at {
        println!("updated:     {}", updated_at);
    }
    if let Some(last_viewed) = media.last_viewed {
        println!("last viewed: {}", last_viewed);
    }
    if !media.collections.is_empty() {
        println!("collections: {}", media.collections.iter().map(|x| x.to_string()).join(", "));
    }
    println!("embed:       {}", media.embed);
}

fn print_trash_entry(entry: &TrashEntry) {
    println!(
        "{}  {:40}  deleted {}",
        entry.media.id, entry.media.title, entry.deleted_at
    );
}
