// Built-in Product Taxonomy
//
// (canonical name, category, synonym keywords). Declaration order matters:
// category ties are won by the category declared first.

use crate::types::ProductCategory::{self, *};

pub const BUILTIN_ENTRIES: &[(&str, ProductCategory, &[&str])] = &[
    // Electronics
    ("Smartphone", Electronics, &["phone", "mobile phone", "cellphone", "iphone", "android"]),
    ("Laptop", Electronics, &["notebook computer", "macbook", "chromebook", "ultrabook"]),
    ("Tablet", Electronics, &["ipad", "e-reader", "kindle"]),
    ("Headphones", Electronics, &["headphone", "earphones", "earbuds", "headset", "airpods"]),
    ("Television", Electronics, &["tv", "television set", "monitor", "screen", "oled"]),
    ("Camera", Electronics, &["digital camera", "dslr", "mirrorless", "camcorder", "lens"]),
    ("Speaker", Electronics, &["loudspeaker", "bluetooth speaker", "soundbar", "subwoofer"]),
    ("Smartwatch", Electronics, &["fitness tracker", "apple watch", "wearable"]),
    ("Keyboard", Electronics, &["computer keyboard", "mechanical keyboard", "typewriter keyboard"]),
    ("Mouse", Electronics, &["computer mouse", "trackpad", "trackball"]),
    ("Game Console", Electronics, &["playstation", "xbox", "nintendo", "joystick", "gamepad"]),
    // Clothing
    ("Jacket", Clothing, &["coat", "bomber", "denim jacket", "leather jacket", "outerwear", "parka", "windbreaker"]),
    ("Shirt", Clothing, &["t-shirt", "tee", "blouse", "polo", "jersey"]),
    ("Sweater", Clothing, &["jumper", "cardigan", "hoodie", "sweatshirt", "pullover"]),
    ("Jeans", Clothing, &["denim", "trousers", "pants", "chinos"]),
    ("Dress", Clothing, &["gown", "skirt", "sundress", "miniskirt"]),
    ("Shorts", Clothing, &["swim trunks", "board shorts"]),
    // Footwear
    ("Sneakers", Footwear, &["sneaker", "running shoe", "trainer", "tennis shoe", "shoe"]),
    ("Boots", Footwear, &["boot", "cowboy boot", "hiking boot", "chelsea boot"]),
    ("Sandals", Footwear, &["sandal", "flip-flop", "slipper", "clog"]),
    ("Heels", Footwear, &["high heel", "pump", "stiletto", "loafer"]),
    // Accessories
    ("Backpack", Accessories, &["rucksack", "school bag", "daypack"]),
    ("Handbag", Accessories, &["purse", "tote", "clutch", "shoulder bag", "wallet"]),
    ("Sunglasses", Accessories, &["shades", "eyeglasses", "spectacles"]),
    ("Watch", Accessories, &["wristwatch", "analog clock", "digital watch"]),
    ("Hat", Accessories, &["cap", "beanie", "cowboy hat", "sombrero"]),
    ("Jewelry", Accessories, &["necklace", "bracelet", "ring", "earring"]),
    // Home
    ("Lamp", Home, &["table lamp", "desk lamp", "lampshade", "floor lamp"]),
    ("Chair", Home, &["armchair", "rocking chair", "folding chair", "stool"]),
    ("Sofa", Home, &["couch", "studio couch", "loveseat"]),
    ("Pillow", Home, &["cushion", "throw pillow", "quilt", "duvet", "blanket"]),
    ("Vase", Home, &["pot", "planter", "flowerpot"]),
    // Kitchen
    ("Mug", Kitchen, &["coffee mug", "cup", "teacup", "beer mug"]),
    ("Kettle", Kitchen, &["teapot", "electric kettle"]),
    ("Blender", Kitchen, &["mixer", "food processor", "juicer"]),
    ("Coffee Maker", Kitchen, &["espresso maker", "espresso machine", "coffeepot"]),
    ("Cookware", Kitchen, &["frying pan", "wok", "saucepan", "dutch oven", "skillet"]),
    ("Water Bottle", Kitchen, &["bottle", "flask", "thermos", "tumbler"]),
    // Beauty
    ("Perfume", Beauty, &["fragrance", "cologne", "eau de toilette"]),
    ("Lipstick", Beauty, &["lip gloss", "lip balm"]),
    ("Skincare", Beauty, &["lotion", "moisturizer", "sunscreen", "serum", "face cream"]),
    ("Hair Dryer", Beauty, &["blow dryer", "hand blower", "hair straightener"]),
    // Sports
    ("Bicycle", Sports, &["bike", "mountain bike", "road bike", "tricycle"]),
    ("Ball", Sports, &["soccer ball", "football", "basketball", "volleyball", "tennis ball", "golf ball"]),
    ("Yoga Mat", Sports, &["exercise mat", "gym mat"]),
    ("Dumbbell", Sports, &["barbell", "kettlebell", "weights"]),
    ("Racket", Sports, &["tennis racket", "badminton racket", "racquet"]),
    // Toys
    ("Teddy Bear", Toys, &["teddy", "stuffed animal", "plush"]),
    ("Building Blocks", Toys, &["lego", "bricks", "construction set"]),
    ("Puzzle", Toys, &["jigsaw puzzle", "rubik"]),
    ("Doll", Toys, &["action figure", "barbie"]),
    // Books
    ("Book", Books, &["novel", "paperback", "hardcover", "comic book", "book jacket"]),
    ("Notebook", Books, &["journal", "diary", "binder", "planner"]),
    // Grocery
    ("Coffee", Grocery, &["coffee beans", "ground coffee", "espresso"]),
    ("Snack", Grocery, &["chips", "cookies", "granola bar", "pretzel"]),
    ("Cereal", Grocery, &["oatmeal", "muesli", "granola"]),
];
