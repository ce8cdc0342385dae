mod pushback;
mod seeks;
