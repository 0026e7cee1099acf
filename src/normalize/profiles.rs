//! Known upstream layouts, one profile per resource kind
//!
//! Pointers are JSON pointers relative to the payload (item locations) or to a
//! single item (field chains). Chains are tried left to right.

use super::ResourceProfile;
use crate::models::ResourceKind;

pub const HOTELS: ResourceProfile = ResourceProfile {
    kind: ResourceKind::Hotel,
    primary: "/data",
    alternates: &["/data/data", "/results", "/hotels", "/data/hotels", "/result"],
    name: &["/name", "/result_object/name", "/title", "/hotel_name"],
    price: &[
        "/price",
        "/result_object/price",
        "/priceForDisplay",
        "/priceDetails/displayPrice",
        "/price_level",
        "/result_object/price_level",
    ],
    currency: &["/currency", "/price/currency", "/result_object/currency"],
    rating: &[
        "/rating",
        "/result_object/rating",
        "/bubbleRating/rating",
        "/review_score",
    ],
    link: &["/web_url", "/result_object/web_url", "/url", "/link", "/website"],
    image: &[
        "/photo/images/large/url",
        "/result_object/photo/images/large/url",
        "/photo/images/medium/url",
        "/image",
        "/thumbnail",
        "/photos/0",
        "/photos/0/url",
    ],
    address: &[
        "/address",
        "/location_string",
        "/result_object/location_string",
        "/address_obj/street1",
        "/secondaryInfo",
    ],
    search_url: "https://www.tripadvisor.com/Search?q=",
};

pub const RESTAURANTS: ResourceProfile = ResourceProfile {
    kind: ResourceKind::Restaurant,
    primary: "/data",
    alternates: &["/data/data", "/results", "/restaurants", "/data/restaurants"],
    name: &["/name", "/localizedName", "/result_object/name", "/title"],
    price: &["/price", "/priceTag", "/price_level", "/priceRange"],
    currency: &["/currency"],
    rating: &[
        "/rating",
        "/averageRating",
        "/result_object/rating",
        "/bubbleRating/rating",
    ],
    link: &["/web_url", "/url", "/link", "/website"],
    image: &[
        "/photo/images/large/url",
        "/photo/images/medium/url",
        "/image",
        "/thumbnail",
        "/heroImgUrl",
        "/photos/0",
        "/photos/0/url",
    ],
    address: &[
        "/address",
        "/localizedAdditionalNames/longOnlyHierarchy",
        "/location_string",
        "/parentGeoName",
    ],
    search_url: "https://www.tripadvisor.com/Search?q=",
};

pub const RENTALS: ResourceProfile = ResourceProfile {
    kind: ResourceKind::Rental,
    primary: "/results",
    alternates: &["/data", "/listings", "/data/list", "/data/homes"],
    name: &["/name", "/listingName", "/title", "/listing/name"],
    price: &[
        "/price/total",
        "/price/rate",
        "/price",
        "/accommodationPrice",
        "/pricingQuote/price/total/amountFormatted",
    ],
    currency: &["/price/currency", "/currency"],
    rating: &["/rating", "/avgRating", "/listing/avgRating", "/reviewsScore"],
    link: &["/url", "/deeplink", "/listingUrl", "/link"],
    image: &[
        "/picture/url",
        "/image",
        "/thumbnail",
        "/listingPreviewImage",
        "/images/0",
        "/photos/0",
        "/photos/0/url",
    ],
    address: &["/address", "/city", "/listing/city", "/neighborhood"],
    search_url: "https://www.airbnb.com/s/",
};

pub const TOURS: ResourceProfile = ResourceProfile {
    kind: ResourceKind::Tour,
    primary: "/products",
    alternates: &["/products/results", "/data", "/results", "/items"],
    name: &["/title", "/name", "/productName"],
    price: &[
        "/pricing/summary/fromPrice",
        "/price/amount",
        "/price",
        "/fromPrice",
    ],
    currency: &["/pricing/currency", "/price/currency", "/currency"],
    rating: &[
        "/reviews/combinedAverageRating",
        "/rating",
        "/reviews/averageRating",
    ],
    link: &["/productUrl", "/url", "/webURL"],
    image: &[
        "/images/0/variants/3/url",
        "/images/0/variants/0/url",
        "/photoUrl",
        "/image",
        "/thumbnail",
        "/thumbnailURL",
        "/images/0",
    ],
    address: &["/location", "/destinations/0/name", "/primaryDestinationName"],
    search_url: "https://www.viator.com/searchResults/all?text=",
};

/// Profile for a resource kind
#[must_use]
pub fn profile_for(kind: ResourceKind) -> &'static ResourceProfile {
    match kind {
        ResourceKind::Hotel => &HOTELS,
        ResourceKind::Restaurant => &RESTAURANTS,
        ResourceKind::Rental => &RENTALS,
        ResourceKind::Tour => &TOURS,
    }
}
