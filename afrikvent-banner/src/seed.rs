use afrikvent_shared::Banner;
use serde_json::json;

/// Sample campaigns loaded into the in-memory store when no database is configured.
pub fn sample_banners() -> serde_json::Result<Vec<Banner>> {
    serde_json::from_value(json!([
        {
            "id": "banner-1",
            "imageUrl": "/images/promotions/tech-conference-banner.jpg",
            "altText": "TechCorp 2024 Conference - Innovation Summit",
            "href": "https://techcorp.com/conference-2024",
            "openInNewTab": true,
            "overlayText": {
                "title": "TechCorp Innovation Summit 2024",
                "subtitle": "Join 5000+ developers & entrepreneurs",
                "buttonText": "Register Now"
            },
            "height": 250,
            "isActive": true,
            "priority": 10,
            "startDate": "2024-01-01T00:00:00Z",
            "endDate": "2024-12-31T23:59:59Z",
            "clickCount": 156,
            "impressionCount": 8420,
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-15T10:30:00Z",
            "clientId": "client-techcorp",
            "campaignId": "campaign-tech-summit-2024",
            "budget": 5000.0,
            "costPerClick": 2.50,
            "costPerImpression": 0.10
        },
        {
            "id": "banner-2",
            "imageUrl": "/images/promotions/music-festival-banner.jpg",
            "altText": "Summer Music Festival 2024",
            "href": "https://summermusicfest.com/tickets",
            "openInNewTab": true,
            "overlayText": {
                "title": "Summer Music Festival",
                "subtitle": "3 Days of Amazing Music",
                "buttonText": "Buy Tickets"
            },
            "height": 200,
            "isActive": true,
            "priority": 8,
            "startDate": "2024-03-01T00:00:00Z",
            "endDate": "2024-06-30T23:59:59Z",
            "clickCount": 89,
            "impressionCount": 4250,
            "createdAt": "2024-03-01T00:00:00Z",
            "updatedAt": "2024-03-10T14:20:00Z",
            "clientId": "client-musicfest",
            "campaignId": "campaign-summer-fest-2024",
            "budget": 3000.0,
            "costPerClick": 1.80,
            "costPerImpression": 0.08
        }
    ]))
}
