//! Fixed example records served when live search yields nothing

use crate::models::{ResourceKind, SearchResult};

struct DemoEntry {
    name: &'static str,
    price: &'static str,
    rating: &'static str,
    link: &'static str,
    image: &'static str,
    address: &'static str,
}

const HOTELS: [DemoEntry; 3] = [
    DemoEntry {
        name: "Grand Plaza Hotel",
        price: "$189",
        rating: "4.5/5",
        link: "https://www.tripadvisor.com/Hotels",
        image: "https://images.unsplash.com/photo-1566073771259-6a8506099945?w=400",
        address: "123 Main Street, City Center",
    },
    DemoEntry {
        name: "Seaside Boutique Inn",
        price: "$145",
        rating: "4.3/5",
        link: "https://www.tripadvisor.com/Hotels",
        image: "https://images.unsplash.com/photo-1582719478250-c89cae4dc85b?w=400",
        address: "45 Harbour Road, Waterfront",
    },
    DemoEntry {
        name: "Old Town Residence",
        price: "$112",
        rating: "4.1/5",
        link: "https://www.tripadvisor.com/Hotels",
        image: "https://images.unsplash.com/photo-1551882547-ff40c63fe5fa?w=400",
        address: "8 Cathedral Square, Old Town",
    },
];

const RESTAURANTS: [DemoEntry; 3] = [
    DemoEntry {
        name: "La Terrazza",
        price: "$$ - $$$",
        rating: "4.6/5",
        link: "https://www.tripadvisor.com/Restaurants",
        image: "https://images.unsplash.com/photo-1517248135467-4c7edcad34c4?w=400",
        address: "12 Market Street, City Center",
    },
    DemoEntry {
        name: "The Local Kitchen",
        price: "$$",
        rating: "4.4/5",
        link: "https://www.tripadvisor.com/Restaurants",
        image: "https://images.unsplash.com/photo-1414235077428-338989a2e8c0?w=400",
        address: "3 Riverside Walk",
    },
    DemoEntry {
        name: "Street Food Hall",
        price: "$",
        rating: "4.2/5",
        link: "https://www.tripadvisor.com/Restaurants",
        image: "https://images.unsplash.com/photo-1555396273-367ea4eb4db5?w=400",
        address: "77 Station Avenue",
    },
];

const RENTALS: [DemoEntry; 3] = [
    DemoEntry {
        name: "Sunny Loft with Balcony",
        price: "$95",
        rating: "4.8/5",
        link: "https://www.airbnb.com/",
        image: "https://images.unsplash.com/photo-1502672260266-1c1ef2d93688?w=400",
        address: "Arts District",
    },
    DemoEntry {
        name: "Family Apartment near the Park",
        price: "$140",
        rating: "4.6/5",
        link: "https://www.airbnb.com/",
        image: "https://images.unsplash.com/photo-1522708323590-d24dbb6b0267?w=400",
        address: "Parkside",
    },
    DemoEntry {
        name: "Cozy Studio in the Old Town",
        price: "$70",
        rating: "4.5/5",
        link: "https://www.airbnb.com/",
        image: "https://images.unsplash.com/photo-1505691938895-1758d7feb511?w=400",
        address: "Old Town",
    },
];

const TOURS: [DemoEntry; 3] = [
    DemoEntry {
        name: "City Highlights Walking Tour",
        price: "$35",
        rating: "4.7/5",
        link: "https://www.viator.com/",
        image: "https://images.unsplash.com/photo-1469854523086-cc02fe5d8800?w=400",
        address: "City Center",
    },
    DemoEntry {
        name: "Food and Market Tasting Experience",
        price: "$79",
        rating: "4.8/5",
        link: "https://www.viator.com/",
        image: "https://images.unsplash.com/photo-1504674900247-0877df9cc836?w=400",
        address: "Central Market",
    },
    DemoEntry {
        name: "Sunset Boat Cruise",
        price: "$59",
        rating: "4.6/5",
        link: "https://www.viator.com/",
        image: "https://images.unsplash.com/photo-1500375592092-40eb2168fd21?w=400",
        address: "Harbour",
    },
];

/// Demo payload for a resource kind, already in normalized form
#[must_use]
pub fn demo_records(kind: ResourceKind) -> Vec<SearchResult> {
    let entries: &[DemoEntry] = match kind {
        ResourceKind::Hotel => &HOTELS,
        ResourceKind::Restaurant => &RESTAURANTS,
        ResourceKind::Rental => &RENTALS,
        ResourceKind::Tour => &TOURS,
    };

    entries
        .iter()
        .map(|entry| SearchResult {
            kind,
            name: entry.name.to_string(),
            price: entry.price.to_string(),
            rating: entry.rating.to_string(),
            link: entry.link.to_string(),
            image: entry.image.to_string(),
            address: entry.address.to_string(),
        })
        .collect()
}
